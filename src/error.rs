//! User input errors.
//!
//! These are surfaced immediately as a short message and never leave partial
//! state behind. Import, persistence and engine failures have their own
//! types next to the code that raises them.

/// Errors caused by what the user typed or asked for.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("Please enter a valid YouTube URL (got '{0}').")]
    UnrecognizedVideo(String),

    #[error("No video is loaded.")]
    NoVideoLoaded,

    #[error("Cannot save an empty interval ({start:.1}s - {end:.1}s).")]
    EmptyInterval { start: f64, end: f64 },

    #[error("Section not found: {0}")]
    SectionNotFound(String),
}
