//! Object-store read client.
//!
//! Media objects are fetched from an S3-style HTTP endpoint and piped through
//! to the caller chunk by chunk; whole assets are never buffered in memory.

use bytes::Bytes;
use futures::Stream;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::info;

use crate::metrics::METRICS;

const STORE_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Streaming reader over the collection's object store.
pub struct BlobStore {
    http: reqwest::Client,
    base_url: String,
}

impl BlobStore {
    pub fn new(base_url: &str) -> Result<Self, crate::Error> {
        // Connect timeout only: transfers are long-lived streams and get no
        // overall deadline here.
        let http = reqwest::Client::builder()
            .connect_timeout(STORE_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| crate::Error::Config(format!("Failed to build store client: {e}")))?;

        info!(base_url, "Object store client initialized");

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of one stored object.
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    /// Open a byte stream over an object.
    ///
    /// Failures here (connect refused, non-2xx from the store) happen before
    /// any response byte flows and map to a 502. Failures inside the returned
    /// stream happen after headers are committed and surface through the
    /// stream items instead.
    pub async fn open_read_stream(
        &self,
        key: &str,
    ) -> Result<impl Stream<Item = reqwest::Result<Bytes>>, crate::Error> {
        let url = self.object_url(key);
        let response = self.http.get(&url).send().await.map_err(|e| {
            METRICS.storage_open_errors.fetch_add(1, Ordering::Relaxed);
            crate::Error::StorageOpen(format!("GET {url} failed: {e}"))
        })?;

        if !response.status().is_success() {
            METRICS.storage_open_errors.fetch_add(1, Ordering::Relaxed);
            return Err(crate::Error::StorageOpen(format!(
                "store returned {} for {key}",
                response.status()
            )));
        }

        Ok(response.bytes_stream())
    }
}
