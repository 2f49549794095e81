use std::io::{Cursor, Read};

use async_trait::async_trait;
use reqwest::Client;
use zip::ZipArchive;

use crate::error::{AppError, Result};
use crate::models::{ArchiveReference, RawRecord};

use super::ArchiveSource;

pub struct ArchiveFetcher {
    client: Client,
}

impl ArchiveFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArchiveSource for ArchiveFetcher {
    async fn fetch(&self, reference: &ArchiveReference) -> Result<Vec<RawRecord>> {
        let url = reference.url.as_str();
        tracing::info!(file = reference.file_name(), "Downloading archive");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::archive(url, e))?;

        if !response.status().is_success() {
            return Err(AppError::archive(url, format!("HTTP {}", response.status())));
        }

        let bytes = response.bytes().await.map_err(|e| AppError::archive(url, e))?;
        let rows = extract_rows(&bytes).map_err(|e| match e {
            AppError::ArchiveUnreadable { reason, .. } => AppError::archive(url, reason),
            other => AppError::archive(url, other),
        })?;

        tracing::debug!("Read {} rows from {}", rows.len(), url);
        Ok(rows)
    }
}

/// Decodes a zipped, tab-separated, header-less payload into raw rows.
pub fn extract_rows(bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| AppError::archive("<memory>", e))?;

    if archive.is_empty() {
        return Err(AppError::archive("<memory>", "archive contains no files"));
    }
    if archive.len() > 1 {
        tracing::warn!(
            "Archive holds {} entries, reading only the first",
            archive.len()
        );
    }

    let mut payload = Vec::new();
    archive
        .by_index(0)
        .map_err(|e| AppError::archive("<memory>", e))?
        .read_to_end(&mut payload)
        .map_err(|e| AppError::archive("<memory>", e))?;

    let text = String::from_utf8_lossy(&payload);
    let rows = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect();

    Ok(rows)
}
