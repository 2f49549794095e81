use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Row};
use tokio_rusqlite::Connection;

use crate::error::{AppError, Result};
use crate::models::{NewArticle, StoredArticle};

use super::schema::SCHEMA;
use super::ArticleStore;

const DATE_FORMAT: &str = "%Y-%m-%d";

const ARTICLE_COLUMNS: &str =
    "id, external_id, date, title, source, url, sentiment, summary, ingested_at";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;
        Self::with_connection(conn).await
    }

    pub async fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::with_connection(conn).await
    }

    async fn with_connection(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    // Read side, used by the timeline API and by run summaries

    pub async fn count(&self) -> Result<u64> {
        let count = self
            .conn
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM news_articles", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;
        Ok(count.max(0) as u64)
    }

    /// Articles dated in `[from, to]`, oldest first.
    #[allow(dead_code)]
    pub async fn articles_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<StoredArticle>> {
        let from = from.format(DATE_FORMAT).to_string();
        let to = to.format(DATE_FORMAT).to_string();
        let articles = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ARTICLE_COLUMNS} FROM news_articles
                     WHERE date >= ?1 AND date <= ?2
                     ORDER BY date ASC, id ASC"
                ))?;
                let articles = stmt
                    .query_map(params![from, to], article_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(articles)
            })
            .await?;
        Ok(articles)
    }

    /// Newest articles first.
    #[allow(dead_code)]
    pub async fn recent(&self, limit: usize) -> Result<Vec<StoredArticle>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let articles = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ARTICLE_COLUMNS} FROM news_articles
                     ORDER BY date DESC, id DESC
                     LIMIT ?1"
                ))?;
                let articles = stmt
                    .query_map(params![limit], article_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(articles)
            })
            .await?;
        Ok(articles)
    }
}

#[async_trait]
impl ArticleStore for SqliteStore {
    async fn begin(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                if !conn.is_autocommit() {
                    // A previous file left its scope open; discard it.
                    conn.execute_batch("ROLLBACK")?;
                }
                conn.execute_batch("BEGIN IMMEDIATE")?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    async fn exists(&self, external_id: &str) -> Result<bool> {
        let external_id = external_id.to_string();
        let exists = self
            .conn
            .call(move |conn| {
                let exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM news_articles WHERE external_id = ?1)",
                    params![external_id],
                    |row| row.get(0),
                )?;
                Ok(exists)
            })
            .await?;
        Ok(exists)
    }

    async fn add(&self, article: NewArticle) -> Result<StoredArticle> {
        let stored = self
            .conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO news_articles (external_id, date, title, source, url, sentiment, summary)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
                    params![
                        article.external_id,
                        article.date.format(DATE_FORMAT).to_string(),
                        article.title,
                        article.source,
                        article.url,
                        article.sentiment,
                        article.summary,
                    ],
                )?;
                let id = conn.last_insert_rowid();
                let stored = conn.query_row(
                    &format!("SELECT {ARTICLE_COLUMNS} FROM news_articles WHERE id = ?1"),
                    params![id],
                    article_from_row,
                )?;
                Ok(stored)
            })
            .await?;
        Ok(stored)
    }

    async fn commit(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                if !conn.is_autocommit() {
                    conn.execute_batch("COMMIT")?;
                }
                Ok(())
            })
            .await?;
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                if !conn.is_autocommit() {
                    conn.execute_batch("ROLLBACK")?;
                }
                Ok(())
            })
            .await
            .map_err(|e| AppError::Persistence(format!("rollback failed: {}", e)))?;
        Ok(())
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first (e.g., "2026-01-11T12:34:56+00:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // SQLite datetime('now') format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn article_from_row(row: &Row) -> rusqlite::Result<StoredArticle> {
    let raw_date: String = row.get(2)?;
    let date = NaiveDate::parse_from_str(&raw_date, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    Ok(StoredArticle {
        id: row.get(0)?,
        external_id: row.get(1)?,
        date,
        title: row.get(3)?,
        source: row.get(4)?,
        url: row.get(5)?,
        sentiment: row.get(6)?,
        summary: row.get(7)?,
        ingested_at: row
            .get::<_, String>(8)
            .ok()
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(external_id: &str, day: u32) -> NewArticle {
        NewArticle {
            external_id: external_id.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            title: "Article from example.com".to_string(),
            source: "Unknown".to_string(),
            url: format!("https://example.com/{}", external_id),
            sentiment: -0.25,
            summary: format!("This is a mock summary for the article with ID {}.", external_id),
        }
    }

    #[tokio::test]
    async fn add_assigns_id_and_round_trips_fields() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.begin().await.unwrap();

        let first = store.add(article("100", 1)).await.unwrap();
        let second = store.add(article("101", 2)).await.unwrap();
        store.commit().await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.external_id, "100");
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(first.sentiment, -0.25);
        assert_eq!(first.url, "https://example.com/100");
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn exists_sees_pending_inserts() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.begin().await.unwrap();

        assert!(!store.exists("100").await.unwrap());
        store.add(article("100", 1)).await.unwrap();
        assert!(store.exists("100").await.unwrap());

        store.commit().await.unwrap();
        assert!(store.exists("100").await.unwrap());
    }

    #[tokio::test]
    async fn rollback_discards_the_whole_batch() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.begin().await.unwrap();
        store.add(article("1", 1)).await.unwrap();
        store.commit().await.unwrap();

        store.begin().await.unwrap();
        store.add(article("2", 1)).await.unwrap();
        store.add(article("3", 1)).await.unwrap();
        store.rollback().await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert!(!store.exists("2").await.unwrap());
    }

    #[tokio::test]
    async fn unique_key_rejects_duplicates() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.begin().await.unwrap();
        store.add(article("7", 1)).await.unwrap();

        let err = store.add(article("7", 2)).await.unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));

        store.rollback().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn begin_discards_a_dangling_scope() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.begin().await.unwrap();
        store.add(article("1", 1)).await.unwrap();

        store.begin().await.unwrap();
        store.add(article("2", 1)).await.unwrap();
        store.commit().await.unwrap();

        assert!(!store.exists("1").await.unwrap());
        assert!(store.exists("2").await.unwrap());
    }

    #[tokio::test]
    async fn range_and_recent_queries_order_by_date() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.begin().await.unwrap();
        for (id, day) in [("a", 3), ("b", 1), ("c", 2), ("d", 5)] {
            store.add(article(id, day)).await.unwrap();
        }
        store.commit().await.unwrap();

        let window = store
            .articles_between(
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            )
            .await
            .unwrap();
        let ids: Vec<_> = window.iter().map(|a| a.external_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);

        let latest = store.recent(2).await.unwrap();
        let ids: Vec<_> = latest.iter().map(|a| a.external_id.as_str()).collect();
        assert_eq!(ids, vec!["d", "a"]);
    }

    #[tokio::test]
    async fn data_survives_reopening_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news.db");
        let path = path.to_str().unwrap();

        {
            let store = SqliteStore::new(path).await.unwrap();
            store.begin().await.unwrap();
            store.add(article("42", 4)).await.unwrap();
            store.commit().await.unwrap();
        }

        let reopened = SqliteStore::new(path).await.unwrap();
        assert!(reopened.exists("42").await.unwrap());
        assert_eq!(reopened.count().await.unwrap(), 1);
    }
}
