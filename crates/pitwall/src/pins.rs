use crate::prelude::{print, println, *};
use colored::Colorize;
use pitwall_core::pins::{FilePinStore, MemoryPinStore, PersistenceFault, PinStore, Pins};
use regex::Regex;
use std::sync::OnceLock;

const DATA_DIR_NAME: &str = "pitwall";

#[derive(Debug, clap::Parser)]
#[command(name = "pins")]
#[command(about = "Manage pinned races")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List pinned race ids in pin order
    #[clap(name = "list")]
    List(ListOptions),

    /// Pin a race, or unpin it when already pinned
    #[clap(name = "toggle")]
    Toggle(ToggleOptions),

    /// Remove every pin
    #[clap(name = "clear")]
    Clear,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ListOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ToggleOptions {
    /// Race id as <season>-<round>, e.g. 2024-5
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Reports recovered storage faults through the logger
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl pitwall_core::pins::FaultSink for LogSink {
    fn report(&self, fault: &PersistenceFault) {
        log::warn!("{fault}");
    }
}

/// Store selected from --pins-file, the user data directory, or memory
pub fn pins_store(global: &crate::Global) -> Box<dyn PinStore> {
    if let Some(path) = &global.pins_file {
        return Box::new(FilePinStore::new(path.clone()));
    }

    match dirs_next::data_dir() {
        Some(dir) => Box::new(FilePinStore::in_dir(&dir.join(DATA_DIR_NAME))),
        None => {
            log::warn!("No data directory available; pins will not be saved");
            Box::new(MemoryPinStore::default())
        }
    }
}

pub fn open_pins(global: &crate::Global) -> Pins<Box<dyn PinStore>, LogSink> {
    Pins::new(pins_store(global), LogSink)
}

fn pin_id_regex() -> &'static Regex {
    static PIN_ID: OnceLock<Regex> = OnceLock::new();
    PIN_ID.get_or_init(|| Regex::new(r"^\d{4}-\d+$").expect("valid pin id regex"))
}

/// Validates a `<season>-<round>` race id
pub fn validate_pin_id(id: &str) -> Result<String, Error> {
    let id = id.trim();
    if pin_id_regex().is_match(id) {
        Ok(id.to_string())
    } else {
        Err(Error::InvalidPin(id.to_string()))
    }
}

pub fn run(app: App, global: crate::Global) -> Result<()> {
    let pins = open_pins(&global);

    match app.command {
        Commands::List(options) => {
            let current = pins.load();
            if options.json {
                println!("{}", format_pins_json(&current)?);
            } else {
                print!("{}", format_pins_text(&current));
            }
        }
        Commands::Toggle(options) => {
            let id = validate_pin_id(&options.id)?;
            let updated = pins.toggle(&id);
            print!("{}", format_toggle_text(&id, &updated));
        }
        Commands::Clear => {
            pins.clear();
            println!("{}", "Cleared all pinned races".green());
        }
    }

    Ok(())
}

fn format_pins_json(pins: &[String]) -> Result<String> {
    serde_json::to_string_pretty(pins).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

fn format_pins_text(pins: &[String]) -> String {
    let mut result = String::new();

    if pins.is_empty() {
        result.push_str(&format!("{}\n", "No pinned races".yellow()));
        result.push_str(&format!(
            "\n{}:\n  {}\n",
            "To pin a race".bright_white().bold(),
            "pitwall pins toggle <season>-<round>".cyan()
        ));
        return result;
    }

    result.push_str(&format!(
        "{}\n",
        format!("PINNED RACES ({})", pins.len()).bright_yellow().bold()
    ));
    for pin in pins {
        result.push_str(&format!("  {} {}\n", "📌", pin.bright_white()));
    }

    result
}

fn format_toggle_text(id: &str, updated: &[String]) -> String {
    if updated.iter().any(|pin| pin == id) {
        format!("{} {}\n", "Pinned".green(), id.bright_white().bold())
    } else {
        format!("{} {}\n", "Unpinned".yellow(), id.bright_white().bold())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_global(pins_file: Option<PathBuf>) -> crate::Global {
        crate::Global {
            base_url: None,
            pins_file,
            verbose: false,
        }
    }

    #[test]
    fn test_validate_pin_id() {
        assert_eq!(validate_pin_id("2024-5").unwrap(), "2024-5");
        assert_eq!(validate_pin_id(" 1950-12 ").unwrap(), "1950-12");
        assert!(matches!(validate_pin_id("2024"), Err(Error::InvalidPin(_))));
        assert!(matches!(validate_pin_id("24-5"), Err(Error::InvalidPin(_))));
        assert!(matches!(validate_pin_id("2024-x"), Err(Error::InvalidPin(_))));
        assert!(matches!(validate_pin_id(""), Err(Error::InvalidPin(_))));
    }

    #[test]
    fn test_invalid_pin_message() {
        let err = validate_pin_id("monaco").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid pin id: monaco. Expected <season>-<round>, e.g. 2024-5"
        );
    }

    #[test]
    fn test_open_pins_with_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pins.json");
        let global = create_test_global(Some(path.clone()));

        let pins = open_pins(&global);
        assert_eq!(pins.toggle("2024-5"), vec!["2024-5".to_string()]);
        assert_eq!(pins.toggle("2024-1"), vec!["2024-5".to_string(), "2024-1".to_string()]);

        // A second handle on the same file sees the persisted set
        let reopened = open_pins(&global);
        assert_eq!(
            reopened.load(),
            vec!["2024-5".to_string(), "2024-1".to_string()]
        );
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            r#"["2024-5","2024-1"]"#
        );
    }

    #[test]
    fn test_open_pins_clear() {
        let temp_dir = TempDir::new().unwrap();
        let global = create_test_global(Some(temp_dir.path().join("pins.json")));

        let pins = open_pins(&global);
        pins.toggle("2024-5");
        pins.clear();

        assert!(open_pins(&global).load().is_empty());
    }

    #[test]
    fn test_open_pins_corrupt_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pins.json");
        std::fs::write(&path, "{not json").unwrap();

        let pins = open_pins(&create_test_global(Some(path)));
        assert!(pins.load().is_empty());
    }

    #[test]
    fn test_format_pins_text() {
        let formatted = format_pins_text(&["2024-5".to_string(), "2023-1".to_string()]);

        assert!(formatted.contains("PINNED RACES (2)"));
        assert!(formatted.contains("2024-5"));
        assert!(formatted.contains("2023-1"));
    }

    #[test]
    fn test_format_pins_text_empty() {
        let formatted = format_pins_text(&[]);

        assert!(formatted.contains("No pinned races"));
        assert!(formatted.contains("pitwall pins toggle <season>-<round>"));
    }

    #[test]
    fn test_format_pins_json() {
        let json = format_pins_json(&["2024-5".to_string()]).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec!["2024-5".to_string()]);
    }

    #[test]
    fn test_format_toggle_text() {
        assert!(format_toggle_text("2024-5", &["2024-5".to_string()]).contains("Pinned"));
        assert!(format_toggle_text("2024-5", &[]).contains("Unpinned"));
    }
}
