use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A remote archive and the timestamp encoded in its file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveReference {
    pub url: String,
    pub timestamp: NaiveDateTime,
}

impl ArchiveReference {
    pub fn file_name(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or(&self.url)
    }
}

/// One line of an archive payload, fields kept as text.
pub type RawRecord = Vec<String>;
