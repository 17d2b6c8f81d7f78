use anyhow::{Context, Result};
use std::env;

/// Per-collection switch for whether records that already exist are
/// refreshed from the feed or left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdatePolicy {
    pub movies: bool,
    pub tv_shows: bool,
    pub episodes: bool,
}

/// All runtime configuration, read once at startup. Nothing in the crate
/// reads the environment after this point.
#[derive(Debug, Clone)]
pub struct Config {
    pub feed_endpoint: String,
    pub feed_bucket: String,
    pub feed_object: String,
    pub store_url: String,
    pub store_api_key: String,
    pub movie_table: String,
    pub tv_show_table: String,
    pub episode_table: String,
    pub update_policy: UpdatePolicy,
    pub api_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            feed_endpoint: required("FEED_ENDPOINT")?,
            feed_bucket: required("FEED_BUCKET")?,
            feed_object: required("FEED_OBJECT")?,
            store_url: required("STORE_URL")?,
            store_api_key: required("STORE_API_KEY")?,
            movie_table: env::var("MOVIE_TABLE").unwrap_or_else(|_| "movies".to_string()),
            tv_show_table: env::var("TV_SHOW_TABLE").unwrap_or_else(|_| "tv-shows".to_string()),
            episode_table: env::var("EPISODE_TABLE").unwrap_or_else(|_| "episodes".to_string()),
            update_policy: UpdatePolicy {
                movies: bool_var("UPDATE_EXISTING_MOVIES"),
                tv_shows: bool_var("UPDATE_EXISTING_TV_SHOWS"),
                episodes: bool_var("UPDATE_EXISTING_EPISODES"),
            },
            api_key: required("API_KEY")?,
        })
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{} not set", key))
}

fn bool_var(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
