use chrono::NaiveDateTime;
use serde::Serialize;

/// What happened to a single archive during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Committed {
        added: usize,
        duplicates: usize,
        dropped: usize,
    },
    /// Nothing was attempted; the archive could not be fetched or decoded.
    Skipped { reason: String },
    /// Persistence failed partway and the file's pending inserts were discarded.
    RolledBack { reason: String, discarded: usize },
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub url: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    pub catalog_available: bool,
    pub files_seen: usize,
    pub files_failed: usize,
    pub articles_added: usize,
    pub duplicates_skipped: usize,
    pub records_dropped: usize,
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn new(window_start: NaiveDateTime, window_end: NaiveDateTime) -> Self {
        Self {
            window_start,
            window_end,
            catalog_available: true,
            files_seen: 0,
            files_failed: 0,
            articles_added: 0,
            duplicates_skipped: 0,
            records_dropped: 0,
            files: Vec::new(),
        }
    }

    pub fn record(&mut self, url: &str, outcome: FileOutcome) {
        self.files_seen += 1;
        match &outcome {
            FileOutcome::Committed {
                added,
                duplicates,
                dropped,
            } => {
                self.articles_added += added;
                self.duplicates_skipped += duplicates;
                self.records_dropped += dropped;
            }
            FileOutcome::Skipped { .. } | FileOutcome::RolledBack { .. } => {
                self.files_failed += 1;
            }
        }
        self.files.push(FileReport {
            url: url.to_string(),
            outcome,
        });
    }
}
