use config::Config;
use reqwest::Url;
use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use serde_with::{DurationMilliSeconds, serde_as};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    #[serde(rename = "search")]
    pub search_cfg: SearchSettings,
    #[serde(rename = "downloader")]
    pub downloader_cfg: DownloaderSettings,
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        let base_path = std::env::current_dir().expect("Failed to determine the current directory");
        let configuration_directory = base_path.join("configuration");

        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .expect("Failed to parse `APP_ENVIRONMENT`");

        let environment_filename = format!("{}.yml", environment.as_str());

        Config::builder()
            .add_source(config::File::from(configuration_directory.join("base.yml")))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .add_source(config::File::from(
                configuration_directory.join(environment_filename),
            ))
            .build()?
            .try_deserialize()
    }
}

#[serde_as]
#[derive(Deserialize, Debug, Clone)]
pub struct SearchSettings {
    #[serde(deserialize_with = "url_format::deserialize")]
    pub endpoint: Url,
    pub api_key: SecretString,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub timeout_ms: Duration,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DownloaderSettings {
    pub program: PathBuf,
    pub output_directory: PathBuf,
    pub audio_format: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub audio_bitrate_kbps: u32,
    pub expand_playlists: bool,
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            other => Err(format!(
                "{} is not a supported environment. Use 'local' or 'production'.",
                other
            )),
        }
    }
}

mod url_format {
    use reqwest::Url;
    use serde::{Deserialize, Deserializer, de::Error};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Url, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Url::parse(&s).map_err(D::Error::custom)
    }
}
