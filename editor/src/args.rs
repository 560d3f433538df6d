use std::path::PathBuf;

use clap::Parser;

/// Spritework headless editor.
#[derive(Parser, Debug)]
#[command(
    name = "spritework-editor",
    about = "Headless Spritework editor session",
    long_about = "Runs a scripted editing session against a sample sprite project, \
        committing selections and recording undo history frame by frame.\n\n\
        EXAMPLES:\n\
          # Run the whole session with default settings\n\
          spritework-editor\n\
        \n\
          # Use a settings file and stop after 5 frames\n\
          spritework-editor --config spritework.toml --frames 5\n\
        \n\
          # Trace every recorded action\n\
          RUST_LOG=spritework_core=trace spritework-editor",
    version
)]
pub struct Args {
    /// Settings file (TOML). Defaults are used when omitted.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Stop after processing N frames.
    #[arg(long, value_name = "N")]
    pub frames: Option<usize>,
}
