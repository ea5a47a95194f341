//! Command-line definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use abloop::time::parse_time;

/// Version string: `<pkg version> (<git sha> <build date>)` for dev builds.
#[cfg(not(feature = "release"))]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    " ",
    env!("ABLOOP_BUILD_DATE"),
    ")"
);

/// Version string: `<pkg version> (<build date>)` for release builds.
#[cfg(feature = "release")]
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("ABLOOP_BUILD_DATE"), ")");

#[derive(Parser)]
#[command(name = "abloop")]
#[command(about = "Loop A-B intervals of hosted videos and keep named sections per video")]
#[command(version = VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a video URL or id to its canonical id
    Resolve {
        /// URL (watch, youtu.be, embed, shorts) or bare 11-character id
        input: String,
    },

    /// Manage saved sections
    Sections {
        /// Section store directory (overrides the config file)
        #[arg(long, global = true)]
        store: Option<PathBuf>,

        #[command(subcommand)]
        command: SectionsCommands,
    },

    /// Export a video's sections to a JSON file
    Export {
        /// Video URL or id
        video: String,

        /// Output file or directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Section store directory (overrides the config file)
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Import sections from a JSON file
    Import {
        /// Sections file produced by `export`
        file: PathBuf,

        /// Video currently being practiced; sections for the same video are
        /// merged, anything else replaces the stored list
        #[arg(long)]
        video: Option<String>,

        /// Section store directory (overrides the config file)
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Loop an interval against a simulated player and report loop seeks
    Simulate {
        /// Video URL or id
        video: String,

        /// Video duration (ss, m:ss or h:mm:ss)
        #[arg(long, value_parser = parse_clock)]
        duration: f64,

        /// Loop start
        #[arg(short = 'a', long = "from", value_parser = parse_clock)]
        a: f64,

        /// Loop end
        #[arg(short = 'b', long = "to", value_parser = parse_clock)]
        b: f64,

        /// Simulated seconds to run for
        #[arg(long, default_value = "30", value_parser = parse_clock)]
        seconds: f64,

        /// Playback rate (must be on the rate ladder)
        #[arg(long, default_value_t = 1.0)]
        rate: f64,

        /// Simulated seconds per wall-clock second
        #[arg(long, default_value_t = 1.0)]
        time_scale: f64,
    },

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SectionsCommands {
    /// List a video's sections in order
    List {
        /// Video URL or id
        video: String,
    },

    /// Save a new section
    Add {
        /// Video URL or id
        video: String,

        #[arg(long, value_parser = parse_clock)]
        start: f64,

        #[arg(long, value_parser = parse_clock)]
        end: f64,

        /// Section name (default: "Section <n>")
        #[arg(long)]
        name: Option<String>,
    },

    /// Rename a section
    Rename {
        video: String,
        id: String,
        name: String,
    },

    /// Delete a section
    Remove { video: String, id: String },

    /// Move a section from one position to another (0-based)
    Move {
        video: String,
        from: usize,
        to: usize,
    },

    /// List videos that have saved sections
    Videos,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Open configuration in $EDITOR
    Edit,
}

fn parse_clock(s: &str) -> Result<f64, String> {
    parse_time(s).ok_or_else(|| format!("invalid time '{}' (expected ss, m:ss or h:mm:ss)", s))
}
