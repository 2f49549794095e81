use std::sync::Arc;

use chrono::{Duration, NaiveDateTime, Utc};

use crate::db::ArticleStore;
use crate::error::Result;
use crate::gdelt::{normalize, ArchiveSource, Catalog};
use crate::models::{ArchiveReference, CandidateArticle, FileOutcome, NewArticle, RunReport};
use crate::sentiment::{LexiconScorer, PlaceholderTitles, SentimentScorer, TitleExtractor};

#[derive(Debug, Default)]
struct BatchCounts {
    added: usize,
    duplicates: usize,
}

/// Drives one ingestion run: resolve archives, then fetch, normalize and
/// store them one file at a time. A failing file never stops the run.
pub struct Ingestor {
    catalog: Arc<dyn Catalog>,
    archives: Arc<dyn ArchiveSource>,
    store: Arc<dyn ArticleStore>,
    titles: Arc<dyn TitleExtractor>,
    scorer: Arc<dyn SentimentScorer>,
}

impl Ingestor {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        archives: Arc<dyn ArchiveSource>,
        store: Arc<dyn ArticleStore>,
    ) -> Self {
        Self {
            catalog,
            archives,
            store,
            titles: Arc::new(PlaceholderTitles),
            scorer: Arc::new(LexiconScorer::new()),
        }
    }

    #[allow(dead_code)]
    pub fn with_titles(mut self, titles: Arc<dyn TitleExtractor>) -> Self {
        self.titles = titles;
        self
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn SentimentScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Ingests the window ending now and reaching back `days` days.
    pub async fn run_lookback(&self, days: u32) -> RunReport {
        let end = Utc::now().naive_utc();
        self.run(lookback_start(end, days), end).await
    }

    pub async fn run(&self, start: NaiveDateTime, end: NaiveDateTime) -> RunReport {
        let mut report = RunReport::new(start, end);

        let references = match self.catalog.resolve(start, end).await {
            Ok(references) => references,
            Err(e) => {
                tracing::error!("Could not resolve archives, nothing to ingest: {}", e);
                report.catalog_available = false;
                Vec::new()
            }
        };

        for reference in &references {
            let outcome = self.process_file(reference).await;
            report.record(&reference.url, outcome);
        }

        tracing::info!(
            files_seen = report.files_seen,
            files_failed = report.files_failed,
            articles_added = report.articles_added,
            duplicates = report.duplicates_skipped,
            dropped = report.records_dropped,
            "Ingestion complete"
        );
        report
    }

    async fn process_file(&self, reference: &ArchiveReference) -> FileOutcome {
        let url = reference.url.as_str();

        let rows = match self.archives.fetch(reference).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(url, "Skipping archive: {}", e);
                return FileOutcome::Skipped {
                    reason: e.to_string(),
                };
            }
        };

        let normalized = normalize(&rows);
        if normalized.dropped > 0 {
            tracing::debug!(url, "Dropped {} malformed rows", normalized.dropped);
        }
        if normalized.articles.is_empty() {
            tracing::info!(url, "No usable articles in archive");
            return FileOutcome::Committed {
                added: 0,
                duplicates: 0,
                dropped: normalized.dropped,
            };
        }

        tracing::info!(url, "Processing {} articles", normalized.articles.len());

        let mut counts = BatchCounts::default();
        match self.store_batch(&normalized.articles, &mut counts).await {
            Ok(()) => {
                tracing::info!(url, added = counts.added, duplicates = counts.duplicates, "Committed archive");
                FileOutcome::Committed {
                    added: counts.added,
                    duplicates: counts.duplicates,
                    dropped: normalized.dropped,
                }
            }
            Err(e) => {
                tracing::error!(url, discarded = counts.added, "Rolling back archive: {}", e);
                if let Err(rollback_err) = self.store.rollback().await {
                    tracing::error!(url, "Rollback failed: {}", rollback_err);
                }
                FileOutcome::RolledBack {
                    reason: e.to_string(),
                    discarded: counts.added,
                }
            }
        }
    }

    async fn store_batch(&self, articles: &[CandidateArticle], counts: &mut BatchCounts) -> Result<()> {
        self.store.begin().await?;

        for candidate in articles {
            if self.store.exists(&candidate.external_id).await? {
                counts.duplicates += 1;
                continue;
            }
            self.store.add(self.build_article(candidate)).await?;
            counts.added += 1;
        }

        self.store.commit().await
    }

    fn build_article(&self, candidate: &CandidateArticle) -> NewArticle {
        let title = self.titles.title(candidate);
        // The feed's own tone wins; the scorer only fills in when it is blank.
        let sentiment = match candidate.tone {
            Some(tone) => tone,
            None => self.scorer.score(&title),
        }
        .clamp(-1.0, 1.0);

        NewArticle {
            external_id: candidate.external_id.clone(),
            date: candidate.date,
            summary: self.titles.summary(candidate),
            title,
            source: candidate.source.clone(),
            url: candidate.url.clone(),
            sentiment,
        }
    }
}

/// Start of a window reaching `days` back from `end`, saturating at the
/// earliest representable instant.
fn lookback_start(end: NaiveDateTime, days: u32) -> NaiveDateTime {
    let start = Duration::try_days(i64::from(days)).and_then(|span| end.checked_sub_signed(span));
    start.unwrap_or_else(|| {
        tracing::warn!(days, "Lookback reaches past the earliest supported date, clamping");
        NaiveDateTime::MIN
    })
}
