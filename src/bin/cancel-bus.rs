use clap::Parser;
use log::LevelFilter;

use cancel_bus::app::App;
use cancel_bus::cli::{Cli, Command};
use cancel_bus::config::Config;

fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let log_level = if cli.quiet {
        LevelFilter::Error
    } else {
        match cli.verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_target(false)
        .format_timestamp(None)
        .init();

    // Build config from environment, then apply CLI overrides
    let step_ms = match &cli.command {
        Command::Run(args) => args.step_ms,
        _ => None,
    };
    let config = Config::from_env().with_overrides(cli.handler_override(), step_ms);

    let mut app = App::with_stdio(config);
    if let Err(err) = app.run(cli.command) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
