use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitStatus;

use reqwest::Url;
use tokio::{fs, process::Command};
use tracing::{info, instrument, warn};

use crate::{configuration::DownloaderSettings, domain::SanitizedTitle};

#[derive(thiserror::Error, Debug)]
pub enum DownloadError {
    #[error("failed to run the downloader '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("the downloader exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

/// Drives the external `yt-dlp` tool to fetch the best audio-only stream
/// and transcode it into the output directory.
pub struct AudioDownloader {
    program: PathBuf,
    output_directory: PathBuf,
    audio_format: String,
    audio_bitrate_kbps: u32,
    expand_playlists: bool,
}

impl AudioDownloader {
    pub fn new(settings: DownloaderSettings) -> std::io::Result<Self> {
        std::fs::create_dir_all(&settings.output_directory)?;
        Ok(Self {
            program: settings.program,
            output_directory: settings.output_directory,
            audio_format: settings.audio_format,
            audio_bitrate_kbps: settings.audio_bitrate_kbps,
            expand_playlists: settings.expand_playlists,
        })
    }

    /// Runs the tool to completion and returns the produced file name.
    #[instrument(
        name = "Downloading audio",
        skip(self),
        fields(link = %link, base_name = %base_name)
    )]
    pub async fn fetch_audio(
        &self,
        link: &Url,
        base_name: &SanitizedTitle,
    ) -> Result<String, DownloadError> {
        let mut command = Command::new(&self.program);
        command
            .args(["--format", "bestaudio/best"])
            .arg("--extract-audio")
            .args(["--audio-format", &self.audio_format])
            .args(["--audio-quality", &format!("{}K", self.audio_bitrate_kbps)])
            .arg("--output")
            .arg(self.output_template(base_name))
            .arg("--no-warnings");
        if !self.expand_playlists {
            command.arg("--no-playlist");
        }
        command.arg(link.as_str());

        info!("Running '{}' for {}", self.program.display(), link);

        let output = command
            .output()
            .await
            .map_err(|source| DownloadError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            self.discard_partial_downloads(base_name).await;
            return Err(DownloadError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(format!("{}.{}", base_name, self.audio_format))
    }

    /// The tool fills in the extension of whatever intermediate stream it
    /// grabs before transcoding.
    fn output_template(&self, base_name: &SanitizedTitle) -> OsString {
        let mut template = self
            .output_directory
            .join(base_name.as_ref())
            .into_os_string();
        template.push(".%(ext)s");
        template
    }

    /// An interrupted run leaves `*.part` files next to the real output.
    async fn discard_partial_downloads(&self, base_name: &SanitizedTitle) {
        let Ok(mut entries) = fs::read_dir(&self.output_directory).await else {
            return;
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if name.starts_with(base_name.as_ref()) && name.ends_with(".part") {
                warn!("Removing partial download '{}'", name);
                if let Err(error) = fs::remove_file(entry.path()).await {
                    warn!("Failed to remove partial download '{}': {}", name, error);
                }
            }
        }
    }
}
