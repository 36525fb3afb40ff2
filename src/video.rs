//! Workout video search and the swipeable feed built from its results.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::{YoutubeConfig, YOUTUBE_API_KEY_ENV};
use crate::error::{CoachError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub channel: String,
    pub thumbnail_url: String,
}

impl Video {
    /// Autoplaying, muted, looping embed without controls.
    pub fn embed_url(&self) -> String {
        format!(
            "https://www.youtube.com/embed/{id}?autoplay=1&mute=1&controls=0&modestbranding=1&loop=1&playlist={id}",
            id = self.id
        )
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: ItemId,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct ItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

impl SearchItem {
    /// Channels and playlists carry no video id and are skipped.
    fn into_video(self) -> Option<Video> {
        let id = self.id.video_id.filter(|id| !id.is_empty())?;
        let snippet = self.snippet?;
        let thumbnail_url = [
            snippet.thumbnails.high,
            snippet.thumbnails.medium,
            snippet.thumbnails.default,
        ]
        .into_iter()
        .flatten()
        .map(|t| t.url)
        .next()
        .unwrap_or_default();
        Some(Video {
            id,
            title: snippet.title,
            channel: snippet.channel_title,
            thumbnail_url,
        })
    }
}

/// Client for the YouTube Data API search endpoint
pub struct VideoSearchClient {
    client: Client,
    base_url: String,
    api_key: String,
    max_results: u32,
}

impl VideoSearchClient {
    pub fn new(base_url: &str, api_key: &str, max_results: u32, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            max_results,
        })
    }

    pub fn from_config(config: &YoutubeConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(CoachError::MissingApiKey(YOUTUBE_API_KEY_ENV))?;
        Self::new(
            &config.base_url,
            api_key,
            config.max_results,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Search for workout videos. Results without a video id are skipped.
    pub async fn search(&self, query: &str) -> Result<Vec<Video>> {
        let url = format!("{}/search", self.base_url);
        info!(query = %query, max_results = self.max_results, "searching videos");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("q", query),
                ("key", self.api_key.as_str()),
            ])
            .query(&[("maxResults", self.max_results)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "video search failed");
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error)
                .and_then(|e| e.message)
                .unwrap_or(body);
            return Err(CoachError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let videos = parse_search_response(&body)?;
        info!(results = videos.len(), "video search complete");
        Ok(videos)
    }
}

fn parse_search_response(body: &str) -> Result<Vec<Video>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .items
        .into_iter()
        .filter_map(SearchItem::into_video)
        .collect())
}

/// Full-screen feed state: the loaded videos and the one playing.
#[derive(Debug, Clone, Default)]
pub struct VideoFeed {
    videos: Vec<Video>,
    active: usize,
}

impl VideoFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new result set; the latest call wins.
    pub fn replace(&mut self, videos: Vec<Video>) {
        self.videos = videos;
        self.active = 0;
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn active(&self) -> Option<&Video> {
        self.videos.get(self.active)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Move to the next video, staying on the last one at the end.
    pub fn advance(&mut self) -> Option<&Video> {
        if self.active + 1 < self.videos.len() {
            self.active += 1;
        }
        self.active()
    }

    pub fn back(&mut self) -> Option<&Video> {
        self.active = self.active.saturating_sub(1);
        self.active()
    }
}
