//! Subcommand handlers.

pub mod config;
pub mod resolve;
pub mod sections;
pub mod simulate;
pub mod transfer;

use std::path::PathBuf;

use anyhow::Result;

use abloop::sections::{SectionPersistence, SectionStore};
use abloop::storage::FileStore;
use abloop::{extract_video_id, Config, InputError, VideoId};

/// Section collection backed by the on-disk store.
///
/// `dir` overrides the configured storage directory.
pub fn open_sections(config: &Config, dir: Option<PathBuf>) -> Result<SectionStore> {
    let dir = match dir {
        Some(dir) => dir,
        None => config.storage_dir()?,
    };
    let persistence = SectionPersistence::new(
        Box::new(FileStore::new(dir)),
        config.sections.storage_prefix.clone(),
    );
    Ok(SectionStore::new(persistence).with_merge_tolerance(config.sections.merge_tolerance))
}

/// Parse a video argument (URL or bare id).
pub fn video_arg(input: &str) -> Result<VideoId> {
    extract_video_id(input)
        .ok_or_else(|| InputError::UnrecognizedVideo(input.trim().to_string()).into())
}
