//! abloop - A-B loop practice for hosted videos
//!
//! Core library: the loop interval, playback synchronization against an
//! external engine, named sections per video and track gestures. The
//! `abloop` binary is a thin command-line layer over it.

pub mod config;
pub mod drag;
pub mod engine;
pub mod error;
pub mod interval;
pub mod sections;
pub mod session;
pub mod storage;
pub mod sync;
pub mod time;
pub mod video_id;

pub use config::Config;
pub use error::InputError;
pub use interval::{Bounds, IntervalModel};
pub use session::{Command, Event, Session, SessionOptions};
pub use video_id::{extract_video_id, VideoId};
