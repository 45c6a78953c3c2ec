/// High-level command line app
mod app;
/// Definition of command-line args
mod args;
/// Per-workflow failures collected during a run
mod diagnostics;
/// Linearizing every workflow in a source
mod extract;
/// Filesystem operations
mod fs;
/// Turning linearized workflows into training data
mod prepare;
/// Combined command-line run settings
mod settings;
/// Where workflows come from
mod source;
/// Text UI
mod ui;

// exported for tests:
pub use app::App;
pub use args::{Args, Command, ExtractArgs, PrepareArgs, StartPolicyArg};
pub use settings::Settings;

/// Run the command-line app.
pub fn run() -> Result<(), anyhow::Error> {
    use clap::Parser;
    let args = Args::parse();

    // INTERPRET SETTINGS ///////////////
    let settings: Settings = args.try_into()?;

    let log_level = match settings.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    simple_logging::log_to_stderr(log_level);

    // RUN THE THING /////////////////
    let app = App::new(settings);
    app.run()?;

    Ok(())
}
