//! Section export and import documents.
//!
//! Both directions use the same JSON shape:
//!
//! ```json
//! { "videoId": "dQw4w9WgXcQ", "sections": [ { "id": "...", "name": "...", "startTime": 1.0, "endTime": 2.0 } ] }
//! ```
//!
//! Import validation is all-or-nothing: the whole document is checked before
//! anything is handed to the section collection.

use serde::Serialize;
use serde_json::Value;

use super::section::Section;
use crate::video_id::VideoId;

/// Prefix for export filenames when nothing else is configured.
pub const DEFAULT_EXPORT_PREFIX: &str = "ytlooper-sections";

/// Errors from reading an import file.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Could not parse the sections file.")]
    Malformed(#[source] serde_json::Error),

    #[error("Invalid sections file format.")]
    InvalidFormat,

    #[error("Sections file contains invalid data (section {index}: {reason}).")]
    InvalidSection { index: usize, reason: &'static str },
}

/// Export file contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub video_id: VideoId,
    pub sections: Vec<Section>,
}

impl ExportDocument {
    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json(&self) -> String {
        // Strings and finite floats always serialize
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// `<prefix>-<video id>.json`
    pub fn filename(&self, prefix: &str) -> String {
        export_filename(prefix, &self.video_id)
    }
}

pub fn export_filename(prefix: &str, video_id: &VideoId) -> String {
    format!("{}-{}.json", prefix, video_id)
}

/// A section read from an import file; the id may still be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedSection {
    pub id: Option<String>,
    pub name: String,
    pub start_time: f64,
    pub end_time: f64,
}

/// A fully validated import file.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDocument {
    /// Video the sections belong to; `None` when the file does not say
    pub video_id: Option<VideoId>,
    pub sections: Vec<ImportedSection>,
}

impl ImportDocument {
    /// Parse and validate an import file.
    ///
    /// # Errors
    /// - `Malformed` if the text is not JSON
    /// - `InvalidFormat` if there is no `sections` array or `videoId` is not a valid id
    /// - `InvalidSection` if any entry lacks a string `name`, numeric
    ///   `startTime`/`endTime`, or has `endTime <= startTime`
    pub fn parse(json: &str) -> Result<Self, ImportError> {
        let value: Value = serde_json::from_str(json).map_err(ImportError::Malformed)?;
        let obj = value.as_object().ok_or(ImportError::InvalidFormat)?;
        let raw_sections = obj
            .get("sections")
            .and_then(Value::as_array)
            .ok_or(ImportError::InvalidFormat)?;

        let video_id = match obj.get("videoId") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => {
                Some(VideoId::new(s.as_str()).map_err(|_| ImportError::InvalidFormat)?)
            }
            Some(_) => return Err(ImportError::InvalidFormat),
        };

        let sections = raw_sections
            .iter()
            .enumerate()
            .map(|(index, raw)| parse_section(index, raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            video_id,
            sections,
        })
    }
}

fn parse_section(index: usize, raw: &Value) -> Result<ImportedSection, ImportError> {
    let invalid = |reason| ImportError::InvalidSection { index, reason };

    let obj = raw.as_object().ok_or_else(|| invalid("not an object"))?;
    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("name must be a string"))?;
    let start_time = obj
        .get("startTime")
        .and_then(Value::as_f64)
        .ok_or_else(|| invalid("startTime must be a number"))?;
    let end_time = obj
        .get("endTime")
        .and_then(Value::as_f64)
        .ok_or_else(|| invalid("endTime must be a number"))?;
    if end_time <= start_time {
        return Err(invalid("endTime must be after startTime"));
    }

    // Ids of any other type are dropped and regenerated
    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    Ok(ImportedSection {
        id,
        name: name.to_string(),
        start_time,
        end_time,
    })
}
