//! The persisted section record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interval::Bounds;

/// A user-named interval saved for later replay.
///
/// Serialized with the field names used by export files and the store
/// (`id`, `name`, `startTime`, `endTime`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl Section {
    /// Create a section with a freshly generated id.
    pub fn new(name: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            id: new_section_id(),
            name: name.into(),
            start_time: bounds.start,
            end_time: bounds.end,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.start_time, self.end_time)
    }

    /// Same name and both ends within `tolerance` seconds.
    pub fn is_near_duplicate(&self, other: &Section, tolerance: f64) -> bool {
        self.name == other.name
            && (self.start_time - other.start_time).abs() < tolerance
            && (self.end_time - other.end_time).abs() < tolerance
    }
}

/// Generate a section id. Ids are never reused, even after deletion.
pub fn new_section_id() -> String {
    format!("sec_{}", Uuid::new_v4().simple())
}

/// Placeholder name for the `n`-th section (1-based).
pub fn default_section_name(n: usize) -> String {
    format!("Section {}", n)
}
