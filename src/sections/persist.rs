//! Reading and writing a video's section list to the key-value store.

use tracing::{debug, warn};

use super::section::Section;
use crate::storage::{KeyValueStore, StoreError};
use crate::video_id::VideoId;

/// Key prefix used when nothing else is configured.
pub const DEFAULT_STORAGE_PREFIX: &str = "ytlooper_sections_";

/// Serializes section lists under `<prefix><video id>`.
pub struct SectionPersistence {
    store: Box<dyn KeyValueStore>,
    prefix: String,
}

impl SectionPersistence {
    pub fn new(store: Box<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn key_for(&self, video_id: &VideoId) -> String {
        format!("{}{}", self.prefix, video_id)
    }

    /// Read the stored list, order preserved.
    ///
    /// A missing key or an entry that does not parse yields an empty list.
    pub fn load(&self, video_id: &VideoId) -> Vec<Section> {
        let key = self.key_for(video_id);
        let Some(raw) = self.store.get(&key) else {
            debug!(%key, "no stored sections");
            return Vec::new();
        };
        match serde_json::from_str::<Vec<Section>>(&raw) {
            Ok(sections) => {
                debug!(%key, count = sections.len(), "sections loaded");
                sections
            }
            Err(e) => {
                warn!(%key, error = %e, "stored sections are corrupt, starting empty");
                Vec::new()
            }
        }
    }

    /// Write the full list for `video_id`.
    ///
    /// An empty list deletes the entry, so the video drops out of `saved_videos`.
    pub fn save(&mut self, video_id: &VideoId, sections: &[Section]) -> Result<(), StoreError> {
        let key = self.key_for(video_id);
        if sections.is_empty() {
            debug!(%key, "no sections left, removing entry");
            return self.store.remove(&key);
        }
        // Serializing plain strings and floats cannot fail
        let json = serde_json::to_string(sections).unwrap_or_else(|_| "[]".to_string());
        self.store.set(&key, &json)
    }

    /// Every video that has a stored section list.
    pub fn saved_videos(&self) -> Vec<VideoId> {
        self.store
            .keys_with_prefix(&self.prefix)
            .into_iter()
            .filter_map(|key| VideoId::new(&key[self.prefix.len()..]).ok())
            .collect()
    }
}
