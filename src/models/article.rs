use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_SOURCE: &str = "Unknown";

/// A normalized article as read from the feed, before persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateArticle {
    pub external_id: String,
    pub date: NaiveDate,
    pub source: String,
    pub url: String,
    /// Feed tone rescaled to roughly [-1, 1]; `None` when the feed left it blank.
    pub tone: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewArticle {
    pub external_id: String,
    pub date: NaiveDate,
    pub title: String,
    pub source: String,
    pub url: String,
    pub sentiment: f64,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredArticle {
    pub id: i64,
    pub external_id: String,
    pub date: NaiveDate,
    pub title: String,
    pub source: String,
    pub url: String,
    pub sentiment: f64,
    pub summary: String,
    pub ingested_at: DateTime<Utc>,
}
