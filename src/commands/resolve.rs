//! Resolve subcommand handler

use anyhow::Result;

use abloop::video_id::fragment_for;

use super::video_arg;

/// Print the canonical id and deep-link fragment for a video reference.
pub fn handle(input: &str) -> Result<()> {
    let id = video_arg(input)?;
    println!("{}", id);
    println!("{}", fragment_for(&id));
    Ok(())
}
