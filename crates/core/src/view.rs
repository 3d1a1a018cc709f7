use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a listing is laid out on screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Card,
    List,
}

impl ViewMode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Card => ViewMode::List,
            ViewMode::List => ViewMode::Card,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Card => write!(f, "card"),
            ViewMode::List => write!(f, "list"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" | "cards" => Ok(ViewMode::Card),
            "list" | "table" => Ok(ViewMode::List),
            other => Err(format!("Invalid view: {other}. Valid views: card, list")),
        }
    }
}
