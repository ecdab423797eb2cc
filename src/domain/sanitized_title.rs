use core::fmt;

use tracing::instrument;
use unicode_segmentation::UnicodeSegmentation;

/// Marketing and metadata noise commonly found in video titles. Terms are
/// removed in this exact order, one case-insensitive substring pass each.
const NOISE_TERMS: &[&str] = &[
    "lyrics",
    "official",
    "video",
    "audio",
    "music",
    "hd",
    "hq",
    "lyric",
    "remastered",
    "remaster",
    "oficial",
    "(",
    ")",
    "visulizer",
    "letra",
    "/",
    "  ",
    "|",
    "[",
    "]",
    "{",
    "}",
];

/// Emoticons, symbols and pictographs, transport symbols, flags, dingbats
/// and enclosed characters.
const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F600, 0x1F64F),
    (0x1F300, 0x1F5FF),
    (0x1F680, 0x1F6FF),
    (0x1F1E0, 0x1F1FF),
    (0x2702, 0x27B0),
    (0x24C2, 0x1F251),
];

/// A video title stripped down to something usable as a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedTitle(String);

impl SanitizedTitle {
    #[instrument(name = "Sanitizing video title", skip(title), err(level = "error"))]
    pub fn parse(title: String) -> Result<Self, String> {
        let mut text: String = title.chars().filter(|c| !is_emoji(*c)).collect();
        for term in NOISE_TERMS {
            text = remove_ignore_ascii_case(&text, term);
        }
        let text = text.trim();

        if text.is_empty() {
            Err(format!(
                "Failed to sanitize video title '{}': nothing left after cleaning",
                title
            ))
        } else if text.graphemes(true).count() > 256 {
            Err(String::from("Failed to sanitize video title: too long"))
        } else {
            Ok(Self(text.to_string()))
        }
    }
}

impl fmt::Display for SanitizedTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for SanitizedTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SanitizedTitle {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

fn is_emoji(c: char) -> bool {
    let code = c as u32;
    EMOJI_RANGES
        .iter()
        .any(|(start, end)| (*start..=*end).contains(&code))
}

/// Removes every non-overlapping occurrence of `term` in a single
/// left-to-right pass. `term` must be ASCII.
fn remove_ignore_ascii_case(text: &str, term: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(at) = find_ignore_ascii_case(rest, term) {
        out.push_str(&rest[..at]);
        rest = &rest[at + term.len()..];
    }
    out.push_str(rest);
    out
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}
