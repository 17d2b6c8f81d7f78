use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::config::Config;

/// Source of the content feed document. The whole blob is fetched in one
/// request; the driver parses it.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>>;
}

/// Fetches the feed from an HTTP object store (`{endpoint}/{bucket}/{object}`).
#[derive(Debug, Clone)]
pub struct ObjectStorageFeed {
    client: Client,
    endpoint: String,
    bucket: String,
    object: String,
}

impl ObjectStorageFeed {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.feed_endpoint.trim_end_matches('/').to_string(),
            bucket: config.feed_bucket.clone(),
            object: config.feed_object.clone(),
        }
    }
}

#[async_trait]
impl FeedSource for ObjectStorageFeed {
    async fn fetch(&self) -> Result<Vec<u8>> {
        let url = format!(
            "{}/{}/{}",
            self.endpoint,
            urlencoding::encode(&self.bucket),
            urlencoding::encode(&self.object)
        );
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "Failed to fetch feed object '{}' from bucket '{}'. Status: {}",
                self.object,
                self.bucket,
                response.status()
            ));
        }
        Ok(response.bytes().await?.to_vec())
    }
}
