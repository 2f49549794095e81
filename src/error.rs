use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Archive unreadable ({url}): {reason}")]
    ArchiveUnreadable { url: String, reason: String },

    #[error("Malformed record: {0}")]
    RecordMalformed(String),

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl AppError {
    pub fn archive(url: &str, reason: impl ToString) -> Self {
        AppError::ArchiveUnreadable {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<tokio_rusqlite::Error> for AppError {
    fn from(e: tokio_rusqlite::Error) -> Self {
        AppError::Persistence(e.to_string())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Persistence(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
