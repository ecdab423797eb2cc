mod download;
mod error;
mod search;

pub use download::{AudioDownloader, DownloadError};
pub use error::DownloadSongError;
pub use search::{SearchError, VideoSearchResult, YoutubeSearch};

use tracing::{info, instrument};

use crate::domain::{SanitizedTitle, SearchQuery};

/// Finds the top video for a song name and pulls down its audio track.
pub struct Youtube {
    search: YoutubeSearch,
    downloader: AudioDownloader,
}

impl Youtube {
    pub fn new(search: YoutubeSearch, downloader: AudioDownloader) -> Self {
        Self { search, downloader }
    }

    /// The whole pipeline: search, sanitize the title, download. Every
    /// stage failure propagates unchanged.
    #[instrument(name = "Downloading a song by name", skip(self))]
    pub async fn download_song_by_name(
        &self,
        song_name: &str,
    ) -> Result<String, DownloadSongError> {
        let query = SearchQuery::new(song_name);
        let hit = self.search.top_result(&query).await?;
        let title =
            SanitizedTitle::parse(hit.title).map_err(DownloadSongError::InvalidTitle)?;
        let file_name = self.downloader.fetch_audio(&hit.link, &title).await?;

        info!("Downloaded '{}'", file_name);

        Ok(file_name)
    }
}
