use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::{debug, info, instrument};

use crate::{
    configuration::Settings,
    youtube::{AudioDownloader, DownloadSongError, SearchError, Youtube, YoutubeSearch},
};

const QUIT_SENTINEL: &str = "0";
const PROMPT: &str = "\nEnter the name of the song: ";

pub struct Application {
    youtube: Youtube,
}

impl Application {
    #[instrument(name = "Building Application", skip_all)]
    pub fn build(
        Settings {
            search_cfg,
            downloader_cfg,
        }: Settings,
    ) -> Result<Self, anyhow::Error> {
        info!("Building application.");
        debug!("Search configuration: {:?}", search_cfg);
        let search =
            YoutubeSearch::try_from(search_cfg).context("Failed to construct the search client")?;
        debug!("Downloader configuration: {:?}", downloader_cfg);
        let downloader = AudioDownloader::new(downloader_cfg)
            .context("Failed to prepare the output directory")?;

        Ok(Self {
            youtube: Youtube::new(search, downloader),
        })
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let input = BufReader::new(tokio::io::stdin());
        let output = tokio::io::stdout();

        tokio::select! {
            result = run_prompt_loop(&self.youtube, input, output) => result,
            _ = shutdown_signal() => Ok(()),
        }
    }
}

/// Prompt, read a song name, download, report, repeat. The literal
/// sentinel `"0"` (or a closed input stream) ends the loop; every other
/// line, the empty string included, is treated as a song name.
pub async fn run_prompt_loop<R, W>(
    youtube: &Youtube,
    input: R,
    mut output: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    output
        .write_all(b"Type \"0\" to quit the program.\n")
        .await?;

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(song_name) = lines.next_line().await? else {
            break;
        };
        if song_name == QUIT_SENTINEL {
            break;
        }

        let report = match youtube.download_song_by_name(&song_name).await {
            Ok(file_name) => {
                format!("The song has been downloaded successfully: {}\n", file_name)
            }
            Err(error) => failure_report(&error),
        };
        output.write_all(report.as_bytes()).await?;
    }

    Ok(())
}

/// Picks the printed message by error kind; no failure ends the loop.
fn failure_report(error: &DownloadSongError) -> String {
    match error {
        DownloadSongError::Search(SearchError::NoResults) => {
            "No videos matched that song name.\n".to_string()
        }
        DownloadSongError::InvalidTitle(reason) => {
            format!("Could not derive a file name for the song: {}\n", reason)
        }
        error => format!("An error occurred while downloading the song: {:?}", error),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
