use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to retrieve bookmarks: {0}")]
    Retrieval(String),

    #[error("Failed to remove bookmark {id}: {reason}")]
    Deletion { id: String, reason: String },

    #[error("Malformed bookmark tree: {0}")]
    Structure(String),

    #[error("Tab error: {0}")]
    Tab(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
