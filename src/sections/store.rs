//! The ordered section collection of the loaded video.
//!
//! Every mutation writes the whole list back through `SectionPersistence`.
//! Write failures never surface as errors: the in-memory list stays
//! authoritative and a durability warning is kept for the UI.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::persist::SectionPersistence;
use super::section::{default_section_name, new_section_id, Section};
use super::transfer::{ExportDocument, ImportDocument, ImportedSection};
use crate::error::InputError;
use crate::interval::Bounds;
use crate::video_id::VideoId;

/// Default near-duplicate tolerance for merges, in seconds.
pub const DEFAULT_MERGE_TOLERANCE: f64 = 0.5;

/// What an import did to the collection.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    /// Same video: genuinely new entries were appended
    Merged { added: usize, skipped: usize },
    /// Different (or unspecified) video: the collection was replaced
    Replaced {
        count: usize,
        /// Set when the session's video identity switched
        switched_to: Option<VideoId>,
    },
}

/// Sections of one video, in user-defined order.
pub struct SectionStore {
    persistence: SectionPersistence,
    video_id: Option<VideoId>,
    sections: Vec<Section>,
    active: Option<String>,
    merge_tolerance: f64,
    durability_warning: Option<String>,
}

impl SectionStore {
    pub fn new(persistence: SectionPersistence) -> Self {
        Self {
            persistence,
            video_id: None,
            sections: Vec::new(),
            active: None,
            merge_tolerance: DEFAULT_MERGE_TOLERANCE,
            durability_warning: None,
        }
    }

    /// Builder: override the near-duplicate tolerance used by merges.
    pub fn with_merge_tolerance(mut self, tolerance: f64) -> Self {
        self.merge_tolerance = tolerance;
        self
    }

    // === Loading and saving ===

    /// Switch to `video_id` and read its stored list.
    ///
    /// Missing or corrupt data gives an empty list. Clears the active section.
    pub fn load(&mut self, video_id: &VideoId) {
        self.sections = self.persistence.load(video_id);
        self.video_id = Some(video_id.clone());
        self.active = None;
    }

    /// Write the list for the current video, keeping failures as a warning.
    fn save(&mut self) {
        let Some(video_id) = self.video_id.as_ref() else {
            return;
        };
        match self.persistence.save(video_id, &self.sections) {
            Ok(()) => self.durability_warning = None,
            Err(e) => {
                warn!(video_id = %video_id, error = %e, "sections not persisted");
                self.durability_warning = Some(format!(
                    "Sections could not be saved and will be lost when the session ends: {}",
                    e
                ));
            }
        }
    }

    // === Editing ===

    /// Append a section built from `bounds`.
    ///
    /// Blank names fall back to `Section <n>`.
    pub fn add(&mut self, name: Option<&str>, bounds: Bounds) -> Result<&Section, InputError> {
        if bounds.is_empty() || !bounds.start.is_finite() || !bounds.end.is_finite() {
            return Err(InputError::EmptyInterval {
                start: bounds.start,
                end: bounds.end,
            });
        }
        let name = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => default_section_name(self.sections.len() + 1),
        };
        let section = Section::new(name, bounds);
        info!(id = %section.id, name = %section.name, "section added");
        self.sections.push(section);
        self.save();
        let added = self.sections.len() - 1;
        Ok(&self.sections[added])
    }

    /// Rename a section. Blank names and unknown ids are ignored.
    ///
    /// # Returns
    /// `true` if the section was renamed
    pub fn rename(&mut self, id: &str, new_name: &str) -> bool {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return false;
        }
        let Some(section) = self.sections.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        section.name = new_name.to_string();
        debug!(id, name = new_name, "section renamed");
        self.save();
        true
    }

    /// Delete a section, clearing the active selection if it was active.
    pub fn remove(&mut self, id: &str) -> Option<Section> {
        let index = self.sections.iter().position(|s| s.id == id)?;
        let removed = self.sections.remove(index);
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
        info!(id, "section removed");
        self.save();
        Some(removed)
    }

    /// Move the section at `from` to `to`, keeping everything else in order.
    ///
    /// # Returns
    /// `false` for equal or out-of-range indices (nothing changes)
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.sections.len();
        if from == to || from >= len || to >= len {
            return false;
        }
        let moved = self.sections.remove(from);
        self.sections.insert(to, moved);
        debug!(from, to, "section moved");
        self.save();
        true
    }

    /// Mark a section active and return its bounds for the caller to apply.
    pub fn activate(&mut self, id: &str) -> Option<Bounds> {
        let bounds = self.get(id)?.bounds();
        self.active = Some(id.to_string());
        Some(bounds)
    }

    // === Import / export ===

    /// Export document for the current video; `None` if no video or no sections.
    pub fn export(&self) -> Option<ExportDocument> {
        let video_id = self.video_id.clone()?;
        if self.sections.is_empty() {
            return None;
        }
        Some(ExportDocument {
            video_id,
            sections: self.sections.clone(),
        })
    }

    /// Apply a validated import.
    ///
    /// Same video: near-duplicates (same name, both ends within the merge
    /// tolerance) are skipped and the rest appended. Otherwise the whole
    /// collection is replaced and, if the file names a video, the identity
    /// switches to it. Missing or colliding ids are regenerated.
    pub fn import(&mut self, doc: ImportDocument) -> ImportOutcome {
        let same_video = doc.video_id.is_some() && doc.video_id == self.video_id;

        let outcome = if same_video {
            let mut added = 0;
            let mut skipped = 0;
            let mut used: HashSet<String> = self.sections.iter().map(|s| s.id.clone()).collect();
            for imported in doc.sections {
                let section = into_section(imported, &mut used);
                let exists = self
                    .sections
                    .iter()
                    .any(|existing| existing.is_near_duplicate(&section, self.merge_tolerance));
                if exists {
                    skipped += 1;
                } else {
                    self.sections.push(section);
                    added += 1;
                }
            }
            ImportOutcome::Merged { added, skipped }
        } else {
            let mut used = HashSet::new();
            self.sections = doc
                .sections
                .into_iter()
                .map(|imported| into_section(imported, &mut used))
                .collect();
            self.active = None;
            let switched_to = match doc.video_id {
                Some(id) if Some(&id) != self.video_id.as_ref() => {
                    self.video_id = Some(id.clone());
                    Some(id)
                }
                _ => None,
            };
            ImportOutcome::Replaced {
                count: self.sections.len(),
                switched_to,
            }
        };

        info!(?outcome, "sections imported");
        self.save();
        outcome
    }

    // === Queries ===

    pub fn video_id(&self) -> Option<&VideoId> {
        self.video_id.as_ref()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn get(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Non-blocking warning set when the last write failed.
    pub fn durability_warning(&self) -> Option<&str> {
        self.durability_warning.as_deref()
    }

    pub fn persistence(&self) -> &SectionPersistence {
        &self.persistence
    }
}

/// Turn an imported entry into a section with an id unique within `used`.
fn into_section(imported: ImportedSection, used: &mut HashSet<String>) -> Section {
    let id = match imported.id {
        Some(id) if !used.contains(&id) => id,
        _ => new_section_id(),
    };
    used.insert(id.clone());
    Section {
        id,
        name: imported.name,
        start_time: imported.start_time,
        end_time: imported.end_time,
    }
}
