//! portfolio-world CLI entry point.

use clap::Parser;

use portfolio_world::cli::{commands, handle_error, load_config, Cli, Commands};
use portfolio_world::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // init may run before any config file exists
    let config = match (&cli.command, cli.config.as_deref()) {
        (Commands::Init(_), None) => None,
        (_, path) => match load_config(path) {
            Ok(config) => Some(config),
            Err(err) => handle_error(err, cli.json),
        },
    };

    let log_config = config
        .as_ref()
        .map_or_else(LogConfig::default, |c| LogConfig::from(&c.logging));
    let _logger = match LoggerImpl::init(&log_config) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args, config.as_ref(), cli.json).await,
        Commands::Import(args) => {
            commands::import::execute(args, &config.unwrap_or_default(), cli.json).await
        }
        Commands::Actions(args) => {
            commands::actions::execute(args, &config.unwrap_or_default(), cli.json).await
        }
        Commands::Train(args) => {
            commands::train::execute(args, &config.unwrap_or_default(), cli.json).await
        }
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
