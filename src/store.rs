use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::config::Config;
use crate::models::{EpisodeRecord, MovieRecord, TvShowRecord};

/// The three persistent collections, behind one seam so the importer can be
/// tested against an in-memory fake. Lookups return every record matching
/// the natural key; `Err` means the lookup itself failed, which is distinct
/// from an empty match list.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_movies(&self, title: &str) -> Result<Vec<MovieRecord>>;
    async fn put_movie(&self, record: &MovieRecord) -> Result<()>;
    async fn find_tv_shows(&self, title: &str) -> Result<Vec<TvShowRecord>>;
    async fn put_tv_show(&self, record: &TvShowRecord) -> Result<()>;
    async fn find_episodes(&self, show_title: &str, label: &str) -> Result<Vec<EpisodeRecord>>;
    async fn put_episode(&self, record: &EpisodeRecord) -> Result<()>;
}

/// Keyed record store over a bearer-authenticated JSON API. Queries are
/// equality matches on the natural-key fields; writes are full-record
/// upserts keyed the same way.
#[derive(Debug, Clone)]
pub struct RecordStoreClient {
    client: Client,
    base_url: String,
    api_key: String,
    movie_table: String,
    tv_show_table: String,
    episode_table: String,
}

impl RecordStoreClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.store_url.trim_end_matches('/').to_string(),
            api_key: config.store_api_key.clone(),
            movie_table: config.movie_table.clone(),
            tv_show_table: config.tv_show_table.clone(),
            episode_table: config.episode_table.clone(),
        }
    }

    async fn query<T: DeserializeOwned>(
        &self,
        table: &str,
        key: serde_json::Value,
    ) -> Result<Vec<T>> {
        #[derive(serde::Deserialize)]
        struct QueryResponse<T> {
            items: Vec<T>,
        }

        let url = format!("{}/tables/{}/query", self.base_url, table);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({ "key": key }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "Failed to query table '{}'. Status: {}",
                table,
                response.status()
            ));
        }
        let data: QueryResponse<T> = response.json().await?;
        Ok(data.items)
    }

    async fn put<T: Serialize>(&self, table: &str, record: &T) -> Result<()> {
        let url = format!("{}/tables/{}/items", self.base_url, table);
        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_key)
            .json(record)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "Failed to write to table '{}'. Status: {}",
                table,
                response.status()
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for RecordStoreClient {
    async fn find_movies(&self, title: &str) -> Result<Vec<MovieRecord>> {
        self.query(&self.movie_table, json!({ "name": title })).await
    }

    async fn put_movie(&self, record: &MovieRecord) -> Result<()> {
        self.put(&self.movie_table, record).await
    }

    async fn find_tv_shows(&self, title: &str) -> Result<Vec<TvShowRecord>> {
        self.query(&self.tv_show_table, json!({ "name": title })).await
    }

    async fn put_tv_show(&self, record: &TvShowRecord) -> Result<()> {
        self.put(&self.tv_show_table, record).await
    }

    async fn find_episodes(&self, show_title: &str, label: &str) -> Result<Vec<EpisodeRecord>> {
        self.query(
            &self.episode_table,
            json!({ "tvShowName": show_title, "seasonAndEpisode": label }),
        )
        .await
    }

    async fn put_episode(&self, record: &EpisodeRecord) -> Result<()> {
        self.put(&self.episode_table, record).await
    }
}
