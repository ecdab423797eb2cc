use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{configuration::SearchSettings, domain::SearchQuery};

#[derive(Debug)]
pub struct VideoSearchResult {
    pub link: Url,
    pub title: String,
}

#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("no videos matched the query")]
    NoResults,
    #[error("failed to reach the search API")]
    Transport(#[source] reqwest::Error),
    #[error("search API request failed with status {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to decode the search API response")]
    Malformed(#[source] reqwest::Error),
}

pub struct YoutubeSearch {
    http_client: reqwest::Client,
    endpoint: Url,
    api_key: SecretString,
}

impl TryFrom<SearchSettings> for YoutubeSearch {
    type Error = reqwest::Error;

    fn try_from(settings: SearchSettings) -> Result<Self, Self::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(settings.timeout_ms)
            .build()?;
        Ok(Self {
            http_client,
            endpoint: settings.endpoint,
            api_key: settings.api_key,
        })
    }
}

impl YoutubeSearch {
    /// Requests a single result from the index; the top-ranked hit is the
    /// only one that comes back.
    #[instrument(name = "Searching for a video", skip(self), fields(query = %query))]
    pub async fn top_result(&self, query: &SearchQuery) -> Result<VideoSearchResult, SearchError> {
        let response = self
            .http_client
            .get(self.endpoint.clone())
            .query(&[
                ("key", self.api_key.expose_secret()),
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", "1"),
                ("q", query.as_ref()),
            ])
            .send()
            .await
            .map_err(SearchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }

        let body: SearchResponse = response.json().await.map_err(SearchError::Malformed)?;

        let hit = body
            .items
            .into_iter()
            .find_map(|item| {
                let id = item.id.video_id?;
                Some(VideoSearchResult {
                    link: watch_link(&id),
                    title: item.snippet.title,
                })
            })
            .ok_or(SearchError::NoResults)?;

        info!("Found video '{}' at {}", hit.title, hit.link);

        Ok(hit)
    }
}

fn watch_link(video_id: &str) -> Url {
    Url::parse_with_params("https://www.youtube.com/watch", [("v", video_id)])
        .expect("the watch URL base is valid")
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: SearchItemSnippet,
}

#[derive(Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct SearchItemSnippet {
    title: String,
}
