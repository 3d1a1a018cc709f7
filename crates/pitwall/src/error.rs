#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("{0}")]
    Fetch(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid pin id: {0}. Expected <season>-<round>, e.g. 2024-5")]
    InvalidPin(String),

    #[error("Invalid page: {0}")]
    InvalidPage(String),
}
