mod repository;
mod schema;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewArticle, StoredArticle};

pub use repository::SqliteStore;

/// Destination of ingested articles, one transaction per source archive.
///
/// Callers check `exists` before every `add`; the unique key on the external
/// id rejects anything that slips through.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn begin(&self) -> Result<()>;
    async fn exists(&self, external_id: &str) -> Result<bool>;
    async fn add(&self, article: NewArticle) -> Result<StoredArticle>;
    async fn commit(&self) -> Result<()>;
    async fn rollback(&self) -> Result<()>;
}
