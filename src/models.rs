use serde::{Deserialize, Serialize};

// Incoming feed entities. The top-level document is walked as raw JSON so a
// malformed entity fails on its own; these shapes are deserialized one array
// element at a time.

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieEntry {
    pub title: String,
    pub release_date: String,
    pub long_description: String,
    pub thumbnail: String,
    pub rating: String,
    pub cast: Vec<String>,
    pub director: String,
    pub genres: Vec<String>,
    pub content: MediaContent,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TvShowEntry {
    pub title: String,
    pub release_date: String,
    pub short_description: String,
    pub thumbnail: String,
    pub rating: String,
    pub cast: Vec<String>,
    pub director: String,
    pub genres: Vec<String>,
    pub seasons: Vec<SeasonEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonEntry {
    pub title: String,
    // Episodes stay raw so one malformed episode cannot sink its season.
    #[serde(default)]
    pub episodes: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeEntry {
    pub title: String,
    pub episode_number: i64,
    pub release_date: String,
    pub long_description: String,
    pub thumbnail: String,
    pub rating: String,
    pub cast: Vec<String>,
    pub director: String,
    pub genres: Vec<String>,
    pub content: MediaContent,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaContent {
    pub duration: i64,
    #[serde(default)]
    pub videos: Vec<VideoEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoEntry {
    pub video_type: String,
    pub url: String,
}

// Stored records, one per collection. Field names match the persisted
// documents; `dateAdded`, `lastWatched` and `views` belong to playback
// tracking and are never sourced from the feed on update.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    pub name: String,
    pub year: String,
    pub description: String,
    pub thumbnail_url: String,
    pub rating: String,
    pub cast: Vec<String>,
    pub director: String,
    pub genres: Vec<String>,
    pub duration: i64,
    pub video_type: String,
    pub video_url: String,
    pub trailer_url: Option<String>,
    pub date_added: String,
    pub last_watched: Option<String>,
    pub views: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TvShowRecord {
    pub name: String,
    pub description: String,
    pub thumbnail_url: String,
    pub release_date: String,
    pub rating: String,
    pub cast: Vec<String>,
    pub director: String,
    pub genres: Vec<String>,
    pub number_of_seasons: i64,
    pub date_added: String,
    pub last_watched: Option<String>,
    pub views: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeRecord {
    pub tv_show_name: String,
    pub season_and_episode: String,
    pub season: String,
    pub episode: i64,
    pub name: String,
    pub description: String,
    pub thumbnail_url: String,
    pub release_date: String,
    pub rating: String,
    pub cast: Vec<String>,
    pub director: String,
    pub genres: Vec<String>,
    pub video_type: String,
    pub video_url: String,
    pub duration: i64,
    pub date_added: String,
    pub last_watched: Option<String>,
    pub views: i64,
}
