//! Export and import subcommand handlers

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use abloop::sections::{ImportDocument, ImportOutcome};
use abloop::Config;

use super::sections::check_saved;
use super::{open_sections, video_arg};

/// Write a video's sections to `<export_prefix>-<id>.json`.
///
/// `output` may name a file or an existing directory.
pub fn handle_export(
    video: &str,
    output: Option<PathBuf>,
    store_dir: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load()?;
    let mut store = open_sections(&config, store_dir)?;
    let id = video_arg(video)?;
    store.load(&id);

    let Some(doc) = store.export() else {
        println!("No sections to export for {}", id);
        return Ok(());
    };

    let filename = doc.filename(&config.sections.export_prefix);
    let path = match output {
        Some(path) if path.is_dir() => path.join(filename),
        Some(path) => path,
        None => PathBuf::from(filename),
    };
    fs::write(&path, doc.to_json())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Exported {} section(s) to {}", doc.sections.len(), path.display());
    Ok(())
}

/// Read a sections file and merge it into (or replace) the stored list.
///
/// Without `--video` the file's own video is taken as the one being
/// practiced, so its stored sections are merged rather than overwritten.
pub fn handle_import(file: &Path, video: Option<&str>, store_dir: Option<PathBuf>) -> Result<()> {
    let json = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let doc = ImportDocument::parse(&json)?;

    let config = Config::load()?;
    let mut store = open_sections(&config, store_dir)?;
    let current = match (video, &doc.video_id) {
        (Some(video), _) => video_arg(video)?,
        (None, Some(id)) => id.clone(),
        (None, None) => bail!("The sections file does not name a video; pass --video"),
    };
    store.load(&current);

    match store.import(doc) {
        ImportOutcome::Merged { added, skipped } => {
            println!("Merged {} new section(s), skipped {} duplicate(s)", added, skipped)
        }
        ImportOutcome::Replaced { count, .. } => {
            let id = store.video_id().map(|id| id.to_string()).unwrap_or_default();
            println!("Imported {} section(s) for {}", count, id)
        }
    }
    check_saved(&store)
}
