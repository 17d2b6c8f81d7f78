use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::UpdatePolicy;
use crate::feed::FeedSource;
use crate::models::{EpisodeEntry, MovieEntry, TvShowEntry};
use crate::reconcile::{
    reconcile_episode, reconcile_movie, reconcile_tv_show, season_episode_label, Action,
};
use crate::store::CatalogStore;

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct KindSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub movies: KindSummary,
    pub tv_shows: KindSummary,
    pub episodes: KindSummary,
}

enum Outcome {
    Created,
    Updated,
    Skipped,
}

impl KindSummary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Created => self.created += 1,
            Outcome::Updated => self.updated += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }
}

/// Walks the content feed and reconciles every entity against the catalog.
/// A failure to fetch or parse the feed aborts the run; anything that goes
/// wrong with a single entity is logged and counted, and the walk continues.
pub struct Importer {
    feed: Arc<dyn FeedSource>,
    store: Arc<dyn CatalogStore>,
    policy: UpdatePolicy,
}

impl Importer {
    pub fn new(feed: Arc<dyn FeedSource>, store: Arc<dyn CatalogStore>, policy: UpdatePolicy) -> Self {
        Self { feed, store, policy }
    }

    pub async fn run(&self) -> Result<ImportSummary> {
        info!("Import started");

        let raw = self.feed.fetch().await.context("Failed to fetch content feed")?;
        let document: Value =
            serde_json::from_slice(&raw).context("Content feed is not valid JSON")?;
        let movies = document
            .get("Movies")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("Content feed has no 'Movies' array"))?;
        let tv_shows = document
            .get("TV Shows")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("Content feed has no 'TV Shows' array"))?;

        let mut summary = ImportSummary::default();
        self.import_movies(movies, &mut summary).await;
        self.import_tv_shows(tv_shows, &mut summary).await;

        info!(
            "Import completed: {} movies, {} tv shows, {} episodes created",
            summary.movies.created, summary.tv_shows.created, summary.episodes.created
        );
        Ok(summary)
    }

    async fn import_movies(&self, movies: &[Value], summary: &mut ImportSummary) {
        info!("Movie import started");
        for raw in movies {
            match self.import_movie(raw).await {
                Ok(outcome) => summary.movies.record(&outcome),
                Err(e) => {
                    summary.movies.failed += 1;
                    error!(
                        "Error creating/updating Movie '{}': {:#}",
                        entity_title(raw),
                        e
                    );
                }
            }
        }
        info!("Movie import completed");
    }

    async fn import_movie(&self, raw: &Value) -> Result<Outcome> {
        let entry: MovieEntry =
            serde_json::from_value(raw.clone()).context("Malformed movie entity")?;
        let existing = self.store.find_movies(&entry.title).await?;
        match reconcile_movie(&entry, &existing, self.policy.movies, Utc::now())? {
            Action::Create(record) => {
                self.store.put_movie(&record).await?;
                info!("Added new Movie: {}", entry.title);
                Ok(Outcome::Created)
            }
            Action::Update(records) => {
                for record in &records {
                    self.store.put_movie(record).await?;
                }
                info!("Updated Movie: {}", entry.title);
                Ok(Outcome::Updated)
            }
            Action::Skip => Ok(Outcome::Skipped),
        }
    }

    async fn import_tv_shows(&self, tv_shows: &[Value], summary: &mut ImportSummary) {
        info!("TV Show import started");
        for raw in tv_shows {
            let entry: TvShowEntry = match serde_json::from_value(raw.clone()) {
                Ok(entry) => entry,
                Err(e) => {
                    summary.tv_shows.failed += 1;
                    error!(
                        "Error creating/updating TV Show '{}': Malformed tv show entity: {:#}",
                        entity_title(raw),
                        e
                    );
                    continue;
                }
            };

            match self.import_tv_show(&entry).await {
                Ok(outcome) => summary.tv_shows.record(&outcome),
                Err(e) => {
                    summary.tv_shows.failed += 1;
                    error!("Error creating/updating TV Show '{}': {:#}", entry.title, e);
                }
            }

            for season in &entry.seasons {
                for raw_episode in &season.episodes {
                    match self.import_episode(&entry.title, &season.title, raw_episode).await {
                        Ok(outcome) => summary.episodes.record(&outcome),
                        Err(e) => {
                            summary.episodes.failed += 1;
                            error!(
                                "Error creating/updating Episode of '{}', season '{}': {:#}",
                                entry.title, season.title, e
                            );
                        }
                    }
                }
            }
        }
        info!("TV Show import completed");
    }

    async fn import_tv_show(&self, entry: &TvShowEntry) -> Result<Outcome> {
        let existing = self.store.find_tv_shows(&entry.title).await?;
        match reconcile_tv_show(entry, &existing, self.policy.tv_shows, Utc::now())? {
            Action::Create(record) => {
                self.store.put_tv_show(&record).await?;
                info!("Added new TV Show: {}", entry.title);
                Ok(Outcome::Created)
            }
            Action::Update(records) => {
                for record in &records {
                    self.store.put_tv_show(record).await?;
                }
                info!("Updated TV Show: {}", entry.title);
                Ok(Outcome::Updated)
            }
            Action::Skip => Ok(Outcome::Skipped),
        }
    }

    async fn import_episode(
        &self,
        show_title: &str,
        season_title: &str,
        raw: &Value,
    ) -> Result<Outcome> {
        let entry: EpisodeEntry =
            serde_json::from_value(raw.clone()).context("Malformed episode entity")?;
        let label = season_episode_label(season_title, entry.episode_number)?;
        let existing = self.store.find_episodes(show_title, &label).await?;
        match reconcile_episode(
            show_title,
            season_title,
            &label,
            &entry,
            &existing,
            self.policy.episodes,
            Utc::now(),
        )? {
            Action::Create(record) => {
                self.store.put_episode(&record).await?;
                info!("Added new Episode: {} {}", show_title, label);
                Ok(Outcome::Created)
            }
            Action::Update(records) => {
                for record in &records {
                    self.store.put_episode(record).await?;
                }
                info!("Updated Episode: {} {}", show_title, label);
                Ok(Outcome::Updated)
            }
            Action::Skip => Ok(Outcome::Skipped),
        }
    }
}

fn entity_title(raw: &Value) -> &str {
    raw.get("title").and_then(Value::as_str).unwrap_or("<no title>")
}
