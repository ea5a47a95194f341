//! Sections subcommand handlers

use std::path::PathBuf;

use anyhow::{bail, Result};

use abloop::sections::SectionStore;
use abloop::time::format_time;
use abloop::{Bounds, Config, InputError};

use super::{open_sections, video_arg};
use crate::cli::SectionsCommands;

pub fn handle(command: SectionsCommands, store_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let mut store = open_sections(&config, store_dir)?;

    match command {
        SectionsCommands::List { video } => {
            store.load(&video_arg(&video)?);
            print_sections(&store);
        }
        SectionsCommands::Add {
            video,
            start,
            end,
            name,
        } => {
            store.load(&video_arg(&video)?);
            let section = store.add(name.as_deref(), Bounds::new(start, end))?;
            println!("Added {} ({})", section.name, section.id);
            check_saved(&store)?;
        }
        SectionsCommands::Rename { video, id, name } => {
            store.load(&video_arg(&video)?);
            if store.get(&id).is_none() {
                return Err(InputError::SectionNotFound(id).into());
            }
            if !store.rename(&id, &name) {
                bail!("Section name cannot be empty");
            }
            check_saved(&store)?;
        }
        SectionsCommands::Remove { video, id } => {
            store.load(&video_arg(&video)?);
            let removed = store
                .remove(&id)
                .ok_or_else(|| InputError::SectionNotFound(id.clone()))?;
            println!("Removed {}", removed.name);
            check_saved(&store)?;
        }
        SectionsCommands::Move { video, from, to } => {
            store.load(&video_arg(&video)?);
            if from >= store.len() || to >= store.len() {
                bail!(
                    "Position out of range (video has {} section(s))",
                    store.len()
                );
            }
            if store.reorder(from, to) {
                check_saved(&store)?;
            }
            print_sections(&store);
        }
        SectionsCommands::Videos => {
            for id in store.persistence().saved_videos() {
                println!("{}", id);
            }
        }
    }
    Ok(())
}

/// Fail the command if the last write did not reach the disk.
pub fn check_saved(store: &SectionStore) -> Result<()> {
    match store.durability_warning() {
        Some(warning) => bail!("{}", warning),
        None => Ok(()),
    }
}

fn print_sections(store: &SectionStore) {
    let Some(video_id) = store.video_id() else {
        return;
    };
    if store.is_empty() {
        println!("No sections saved for {}", video_id);
        return;
    }
    for (i, section) in store.sections().iter().enumerate() {
        println!(
            "{:>3}  {} - {}  {}  [{}]",
            i,
            format_time(section.start_time),
            format_time(section.end_time),
            section.name,
            section.id
        );
    }
}
