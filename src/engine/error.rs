//! Engine error codes mapped to user-facing categories.

/// What went wrong on the engine side, as far as the user is concerned.
///
/// Engine errors are never retried; the message is shown as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EngineErrorKind {
    #[error("Invalid video ID.")]
    InvalidId,

    #[error("This video cannot be played in an embedded player.")]
    EmbedDisallowed,

    #[error("Video not found or removed.")]
    NotFound,

    #[error("The video owner does not allow embedded playback.")]
    OwnerRestricted,

    #[error("An error occurred loading the video.")]
    Unknown,
}

impl EngineErrorKind {
    /// Map a raw engine error code.
    pub fn from_code(code: i32) -> Self {
        match code {
            2 => Self::InvalidId,
            5 => Self::EmbedDisallowed,
            100 => Self::NotFound,
            101 | 150 => Self::OwnerRestricted,
            _ => Self::Unknown,
        }
    }
}
