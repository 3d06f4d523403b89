// reframe - Frame a photo and hand it to a photo-sharing app
// Replays ratio/background taps, saves the photo into a library directory and
// opens it in the share target app

use anyhow::Result;
use log::info;
use reframe::{app, cli};

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args = cli::parse_args()?;

    info!(
        "Starting reframe, library: {}, share target: {} ({}://)",
        args.library.display(),
        args.target.name,
        args.target.scheme
    );

    app::run(args)
}
