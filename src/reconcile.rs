use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use crate::models::{EpisodeEntry, EpisodeRecord, MovieEntry, MovieRecord, TvShowEntry, TvShowRecord};

/// Season titles that are not numbered seasons and keep their name in the
/// episode key. Matching is exact and case-sensitive.
const SPECIAL_SEASONS: [&str; 4] = ["Pilot", "Extras", "Movies", "Mini Series"];

/// Outcome of reconciling one incoming entity against its existing matches.
/// `Update` carries one record per match so duplicate keys (a data anomaly)
/// each keep their own protected fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Action<R> {
    Create(R),
    Update(Vec<R>),
    Skip,
}

/// Timestamps are stored as `YYYY-MM-DD HH:MM:SS mmm`, with a space before
/// the three millisecond digits. Existing records depend on this shape.
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d %H:%M:%S %3f").to_string()
}

/// Derives the composite episode key, e.g. `"S03 E07"` or `"Pilot E01"`.
/// The padding must stay stable across imports or episodes re-key.
pub fn season_episode_label(season_title: &str, episode_number: i64) -> Result<String> {
    if SPECIAL_SEASONS.contains(&season_title) {
        return Ok(format!("{} E{:02}", season_title, episode_number));
    }
    let season: i64 = season_title
        .trim()
        .parse()
        .with_context(|| format!("Season title '{}' is neither numeric nor a special season", season_title))?;
    Ok(format!("S{:02} E{:02}", season, episode_number))
}

pub fn reconcile_movie(
    incoming: &MovieEntry,
    existing: &[MovieRecord],
    update_existing: bool,
    now: DateTime<Utc>,
) -> Result<Action<MovieRecord>> {
    if existing.is_empty() {
        return Ok(Action::Create(build_movie(
            incoming,
            None,
            format_timestamp(now),
            None,
            0,
        )?));
    }
    if !update_existing {
        return Ok(Action::Skip);
    }
    existing
        .iter()
        .map(|current| {
            build_movie(
                incoming,
                current.trailer_url.clone(),
                current.date_added.clone(),
                current.last_watched.clone(),
                current.views,
            )
        })
        .collect::<Result<Vec<_>>>()
        .map(Action::Update)
}

pub fn reconcile_tv_show(
    incoming: &TvShowEntry,
    existing: &[TvShowRecord],
    update_existing: bool,
    now: DateTime<Utc>,
) -> Result<Action<TvShowRecord>> {
    if existing.is_empty() {
        return Ok(Action::Create(build_tv_show(
            incoming,
            format_timestamp(now),
            None,
            0,
        )));
    }
    if !update_existing {
        return Ok(Action::Skip);
    }
    let updated = existing
        .iter()
        .map(|current| {
            build_tv_show(
                incoming,
                current.date_added.clone(),
                current.last_watched.clone(),
                current.views,
            )
        })
        .collect();
    Ok(Action::Update(updated))
}

/// The label is the episode's sort key, derived once by the caller (it is
/// also needed for the existing-record lookup).
pub fn reconcile_episode(
    show_title: &str,
    season_title: &str,
    label: &str,
    incoming: &EpisodeEntry,
    existing: &[EpisodeRecord],
    update_existing: bool,
    now: DateTime<Utc>,
) -> Result<Action<EpisodeRecord>> {
    if existing.is_empty() {
        return Ok(Action::Create(build_episode(
            show_title,
            season_title,
            label,
            incoming,
            format_timestamp(now),
            None,
            0,
        )?));
    }
    if !update_existing {
        return Ok(Action::Skip);
    }
    existing
        .iter()
        .map(|current| {
            build_episode(
                show_title,
                season_title,
                label,
                incoming,
                current.date_added.clone(),
                current.last_watched.clone(),
                current.views,
            )
        })
        .collect::<Result<Vec<_>>>()
        .map(Action::Update)
}

fn build_movie(
    incoming: &MovieEntry,
    trailer_url: Option<String>,
    date_added: String,
    last_watched: Option<String>,
    views: i64,
) -> Result<MovieRecord> {
    let video = incoming
        .content
        .videos
        .first()
        .ok_or_else(|| anyhow!("Movie '{}' has no videos", incoming.title))?;
    Ok(MovieRecord {
        name: incoming.title.clone(),
        year: incoming.release_date.clone(),
        description: incoming.long_description.clone(),
        thumbnail_url: incoming.thumbnail.clone(),
        rating: incoming.rating.clone(),
        cast: incoming.cast.clone(),
        director: incoming.director.clone(),
        genres: incoming.genres.clone(),
        duration: incoming.content.duration,
        video_type: video.video_type.clone(),
        video_url: video.url.clone(),
        trailer_url,
        date_added,
        last_watched,
        views,
    })
}

fn build_tv_show(
    incoming: &TvShowEntry,
    date_added: String,
    last_watched: Option<String>,
    views: i64,
) -> TvShowRecord {
    TvShowRecord {
        name: incoming.title.clone(),
        description: incoming.short_description.clone(),
        thumbnail_url: incoming.thumbnail.clone(),
        release_date: incoming.release_date.clone(),
        rating: incoming.rating.clone(),
        cast: incoming.cast.clone(),
        director: incoming.director.clone(),
        genres: incoming.genres.clone(),
        number_of_seasons: incoming.seasons.len() as i64,
        date_added,
        last_watched,
        views,
    }
}

fn build_episode(
    show_title: &str,
    season_title: &str,
    label: &str,
    incoming: &EpisodeEntry,
    date_added: String,
    last_watched: Option<String>,
    views: i64,
) -> Result<EpisodeRecord> {
    let video = incoming
        .content
        .videos
        .first()
        .ok_or_else(|| anyhow!("Episode '{}' has no videos", incoming.title))?;
    Ok(EpisodeRecord {
        tv_show_name: show_title.to_string(),
        season_and_episode: label.to_string(),
        season: season_title.to_string(),
        episode: incoming.episode_number,
        name: incoming.title.clone(),
        description: incoming.long_description.clone(),
        thumbnail_url: incoming.thumbnail.clone(),
        release_date: incoming.release_date.clone(),
        rating: incoming.rating.clone(),
        cast: incoming.cast.clone(),
        director: incoming.director.clone(),
        genres: incoming.genres.clone(),
        video_type: video.video_type.clone(),
        video_url: video.url.clone(),
        duration: incoming.content.duration,
        date_added,
        last_watched,
        views,
    })
}
