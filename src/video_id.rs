//! Video identifier extraction and deep links.
//!
//! A video is addressed by the hosting service's 11-character content key.
//! Users paste anything from a bare key to a full watch URL; this module
//! pulls the key out and round-trips it through the location fragment.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Length of every valid content key.
pub const VIDEO_ID_LEN: usize = 11;

/// Validated 11-character content key (`[A-Za-z0-9_-]{11}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    /// Wrap a bare key, rejecting anything that is not exactly 11 key characters.
    pub fn new(id: impl Into<String>) -> Result<Self, InputError> {
        let id = id.into();
        if is_valid_id(&id) {
            Ok(Self(id))
        } else {
            Err(InputError::UnrecognizedVideo(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VideoId {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

impl std::str::FromStr for VideoId {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        extract_video_id(s).ok_or_else(|| InputError::UnrecognizedVideo(s.trim().to_string()))
    }
}

fn is_valid_id(id: &str) -> bool {
    id.len() == VIDEO_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Patterns tried in order: URL shapes first, then a bare key.
fn patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(
                r"(?:youtube\.com/watch\?.*v=|youtu\.be/|youtube\.com/embed/|youtube\.com/shorts/)([a-zA-Z0-9_-]{11})",
            )
            .expect("static URL pattern compiles"),
            Regex::new(r"^([a-zA-Z0-9_-]{11})$").expect("static id pattern compiles"),
        ]
    })
}

/// Extract the content key from free-form user input.
///
/// Accepts a bare key and the watch, short-link, embed and shorts URL shapes.
/// Surrounding whitespace is ignored.
///
/// # Returns
/// `Some(VideoId)` if a key was found, `None` otherwise
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    let input = input.trim();
    patterns().iter().find_map(|pattern| {
        pattern
            .captures(input)
            .and_then(|caps| caps.get(1))
            .map(|m| VideoId(m.as_str().to_string()))
    })
}

/// Location fragment reflecting the loaded video (`#<id>`).
pub fn fragment_for(id: &VideoId) -> String {
    format!("#{}", id)
}

/// Read the video to load at startup from a location fragment.
///
/// A fragment that does not parse to a valid key yields `None` and no load.
pub fn video_id_from_fragment(fragment: &str) -> Option<VideoId> {
    let raw = fragment.trim().trim_start_matches('#').trim();
    if raw.is_empty() {
        return None;
    }
    extract_video_id(raw)
}
