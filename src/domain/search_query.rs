use core::fmt;

/// Appended to every query to steer the top hit towards lyric videos.
const BIAS_SUFFIX: &str = "lyrics";

#[derive(Debug, Clone)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(song_name: &str) -> Self {
        Self(format!("{} {}", song_name, BIAS_SUFFIX))
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for SearchQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
