// fontman - Generate a merged font manifest and @font-face stylesheet
//
// this_file: fontman/src/main.rs

use clap::Parser;
use fontman::cli::{self, Cli};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Cli::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();

    cli::execute(args)?;

    Ok(())
}
