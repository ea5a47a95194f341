//! abloop command-line entry point

mod cli;
mod commands;

use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ConfigCommands};
use commands::simulate::SimulateArgs;

/// Log to stderr. RUST_LOG wins; otherwise `warn`, or `debug` with `-v`.
fn init_logging(verbose: bool) {
    let default = if verbose { "abloop=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Resolve { input } => commands::resolve::handle(&input),
        Commands::Sections { store, command } => commands::sections::handle(command, store),
        Commands::Export {
            video,
            output,
            store,
        } => commands::transfer::handle_export(&video, output, store),
        Commands::Import { file, video, store } => {
            commands::transfer::handle_import(&file, video.as_deref(), store)
        }
        Commands::Simulate {
            video,
            duration,
            a,
            b,
            seconds,
            rate,
            time_scale,
        } => commands::simulate::handle(SimulateArgs {
            video,
            duration,
            a,
            b,
            seconds,
            rate,
            time_scale,
        }),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(),
            ConfigCommands::Edit => commands::config::handle_edit(),
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "abloop", &mut io::stdout());
            Ok(())
        }
    }
}
