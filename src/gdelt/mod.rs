mod catalog;
mod columns;
mod fetcher;
mod normalizer;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;

use crate::config::Config;
use crate::error::Result;
use crate::models::{ArchiveReference, RawRecord};

pub use catalog::{parse_listing, RemoteCatalog};
pub use columns::{Column, EventRow, COLUMN_NAMES};
pub use fetcher::{extract_rows, ArchiveFetcher};
pub use normalizer::{normalize, Normalized};

/// Lists the archives published inside a time window.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn resolve(&self, start: NaiveDateTime, end: NaiveDateTime)
        -> Result<Vec<ArchiveReference>>;
}

/// Retrieves the raw rows of one archive.
#[async_trait]
pub trait ArchiveSource: Send + Sync {
    async fn fetch(&self, reference: &ArchiveReference) -> Result<Vec<RawRecord>>;
}

/// Shared HTTP client; every request is bounded by the configured timeouts.
pub fn build_client(config: &Config) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::time::Duration;

    use reqwest::Client;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    pub(crate) use super::fetcher::tests::zip_bytes;
    pub(crate) use super::normalizer::tests::event_row;

    pub(crate) fn test_client() -> Client {
        Client::builder()
            .timeout(Duration::from_secs(5))
            .no_proxy()
            .build()
            .unwrap()
    }

    /// Answers a single HTTP request with `status` and `body`, then closes.
    /// Returns the base URL of the listener.
    pub(crate) async fn serve_once(status: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let head = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(&body).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}", addr)
    }
}
