use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::ArchiveReference;

use super::Catalog;

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Column of the master list holding the archive URL (after size and checksum).
const URL_TOKEN: usize = 2;

pub struct RemoteCatalog {
    client: Client,
    master_list_url: String,
    archive_suffix: String,
}

impl RemoteCatalog {
    pub fn new(client: Client, master_list_url: &str, archive_suffix: &str) -> Self {
        Self {
            client,
            master_list_url: master_list_url.to_string(),
            archive_suffix: archive_suffix.to_string(),
        }
    }

    async fn fetch_listing(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.master_list_url)
            .send()
            .await
            .map_err(|e| AppError::CatalogUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::CatalogUnavailable(format!(
                "HTTP {} from {}",
                response.status(),
                self.master_list_url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::CatalogUnavailable(e.to_string()))
    }
}

#[async_trait]
impl Catalog for RemoteCatalog {
    async fn resolve(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<ArchiveReference>> {
        tracing::info!(%start, %end, url = %self.master_list_url, "Resolving archives");
        let listing = self.fetch_listing().await?;
        let references = parse_listing(&listing, start, end, &self.archive_suffix);
        tracing::info!("Found {} archives in window", references.len());
        Ok(references)
    }
}

/// Picks the archives of a master list whose file-name timestamp lies in
/// `[start, end]`. Malformed lines are skipped.
pub fn parse_listing(
    listing: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
    suffix: &str,
) -> Vec<ArchiveReference> {
    listing
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let url = line.split_whitespace().nth(URL_TOKEN)?;
            if !url.ends_with(suffix) {
                return None;
            }
            let timestamp = timestamp_from_url(url)?;
            (start <= timestamp && timestamp <= end).then(|| ArchiveReference {
                url: url.to_string(),
                timestamp,
            })
        })
        .collect()
}

fn timestamp_from_url(url: &str) -> Option<NaiveDateTime> {
    let file_name = url.rsplit('/').next()?;
    let stamp = file_name.split('.').next()?;
    match NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT) {
        Ok(ts) => Some(ts),
        Err(e) => {
            tracing::trace!("Skipping catalog entry {}: {}", url, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdelt::testing::{serve_once, test_client};
    use chrono::NaiveDate;

    const SUFFIX: &str = ".export.CSV.zip";

    fn at(day: u32, hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    const LISTING: &str = "\
150383 297a16b493de7cf6ca809a7cc31d0b93 http://data.gdeltproject.org/gdeltv2/20250301000000.export.CSV.zip
318084 bb27f78ba45f69a17ea6ed7755e9f8ff http://data.gdeltproject.org/gdeltv2/20250301000000.mentions.CSV.zip
10768507 ea8dde0beb0ba98810a92db068c0ce99 http://data.gdeltproject.org/gdeltv2/20250301000000.gkg.csv.zip

149211 2a91041d7e72b0fc6a629e2ff867b240 http://data.gdeltproject.org/gdeltv2/20250301001500.export.CSV.zip
148554 f3dd8d6d4b3d1ba9a3d1e4e7b8a0c4e1 http://data.gdeltproject.org/gdeltv2/20250302120000.export.CSV.zip
151002 0f0e9d2a9c3b7b3c2a1f8e6d5c4b3a29 http://data.gdeltproject.org/gdeltv2/2025030X120000.export.CSV.zip
short line
152114 9b8a7c6d5e4f3a2b1c0d9e8f7a6b5c4d http://data.gdeltproject.org/gdeltv2/20250228234500.export.CSV.zip
";

    #[test]
    fn keeps_only_export_archives_inside_window() {
        let refs = parse_listing(LISTING, at(1, 0, 0), at(1, 23, 59), SUFFIX);

        let urls: Vec<_> = refs.iter().map(|r| r.file_name()).collect();
        assert_eq!(
            urls,
            vec!["20250301000000.export.CSV.zip", "20250301001500.export.CSV.zip"]
        );
        assert_eq!(refs[1].timestamp, at(1, 0, 15));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let refs = parse_listing(LISTING, at(1, 0, 15), at(2, 12, 0), SUFFIX);

        let stamps: Vec<_> = refs.iter().map(|r| r.timestamp).collect();
        assert_eq!(stamps, vec![at(1, 0, 15), at(2, 12, 0)]);
    }

    #[test]
    fn unparseable_timestamps_never_appear() {
        let refs = parse_listing(LISTING, at(1, 0, 0), at(31, 0, 0), SUFFIX);

        assert!(refs.iter().all(|r| !r.url.contains("2025030X")));
        assert_eq!(refs.len(), 3);
    }

    #[test]
    fn empty_listing_yields_nothing() {
        assert!(parse_listing("", at(1, 0, 0), at(2, 0, 0), SUFFIX).is_empty());
        assert!(parse_listing("\n  \n", at(1, 0, 0), at(2, 0, 0), SUFFIX).is_empty());
    }

    #[tokio::test]
    async fn listing_is_fetched_and_filtered() {
        let base = serve_once("200 OK", LISTING.as_bytes().to_vec()).await;
        let catalog = RemoteCatalog::new(test_client(), &format!("{}/masterfilelist.txt", base), SUFFIX);

        let refs = catalog.resolve(at(1, 0, 0), at(1, 23, 59)).await.unwrap();

        let names: Vec<_> = refs.iter().map(|r| r.file_name()).collect();
        assert_eq!(
            names,
            vec!["20250301000000.export.CSV.zip", "20250301001500.export.CSV.zip"]
        );
    }

    #[tokio::test]
    async fn server_error_is_reported_as_catalog_unavailable() {
        let base = serve_once("503 Service Unavailable", b"try later".to_vec()).await;
        let catalog = RemoteCatalog::new(test_client(), &format!("{}/masterfilelist.txt", base), SUFFIX);

        let err = catalog.resolve(at(1, 0, 0), at(2, 0, 0)).await.unwrap_err();

        match err {
            AppError::CatalogUnavailable(reason) => assert!(reason.contains("503")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn unreachable_listing_is_reported_as_catalog_unavailable() {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(2))
            .build()
            .unwrap();
        let catalog = RemoteCatalog::new(client, "http://127.0.0.1:9/masterfilelist.txt", SUFFIX);

        let result = catalog.resolve(at(1, 0, 0), at(2, 0, 0)).await;

        assert!(matches!(result, Err(AppError::CatalogUnavailable(_))));
    }
}
