mod args;
mod history_panel;
mod session;
mod settings;

use std::process::ExitCode;

use clap::Parser;

use session::{Project, Session, demo_script};

fn main() -> ExitCode {
    let args = args::Args::parse();
    let (settings, load_error) = settings::load_or_default(args.config.as_deref());

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log.level.as_str()),
    )
    .init();

    spritework_core::init();
    if let Some(e) = load_error {
        log::warn!("{e}, using default settings");
    }
    log::debug!("Settings: {settings:?}");

    let mut session = match Session::new(Project::sample(), 0, settings.history.max_undo) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Failed to open sprite editor: {e}");
            return ExitCode::FAILURE;
        }
    };

    let summary = session.run(&demo_script(), args.frames);
    log::info!(
        "Processed {} frames ({} rejected): {} undo, {} redo{}",
        summary.frames,
        summary.failed,
        summary.undo_count,
        summary.redo_count,
        if summary.unsaved {
            ", unsaved changes"
        } else {
            ""
        }
    );
    ExitCode::SUCCESS
}
