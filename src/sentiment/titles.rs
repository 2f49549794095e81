use url::Url;

use crate::models::CandidateArticle;

/// Supplies the human-facing title and summary of an article.
///
/// No page content is fetched today, so the only implementation derives
/// placeholders from the candidate itself.
pub trait TitleExtractor: Send + Sync {
    fn title(&self, article: &CandidateArticle) -> String;
    fn summary(&self, article: &CandidateArticle) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderTitles;

impl TitleExtractor for PlaceholderTitles {
    fn title(&self, article: &CandidateArticle) -> String {
        format!("Article from {}", host_of(&article.url))
    }

    fn summary(&self, article: &CandidateArticle) -> String {
        format!(
            "This is a mock summary for the article with ID {}.",
            article.external_id
        )
    }
}

fn host_of(raw: &str) -> String {
    if let Ok(url) = Url::parse(raw) {
        if let Some(host) = url.host_str() {
            return host.to_string();
        }
    }
    // Not a parseable URL; fall back to the third slash-separated segment.
    raw.split('/')
        .nth(2)
        .filter(|s| !s.is_empty())
        .unwrap_or("unknown")
        .to_string()
}
