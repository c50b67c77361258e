//! wms library root.
//! Exposes the CLI parser, the high-level run() function and the attendance
//! modules (state machine, disqualifier, aggregator) for embedding and tests.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::User { .. } => cli::commands::user::handle(&cli.command, cfg),
        Commands::In | Commands::Out => cli::commands::clock::handle(&cli.command, cfg),
        Commands::Entries { .. } | Commands::Edit { .. } | Commands::Del { .. } => {
            cli::commands::entries::handle(&cli.command, cfg)
        }
        Commands::Status { .. } | Commands::Online { .. } => {
            cli::commands::status::handle(&cli.command, cfg)
        }
        Commands::Sweep | Commands::Daemon => cli::commands::sweep::handle(&cli.command, cfg),
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // a second init (tests embedding the library) is not an error
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // load config once; a failure here is still logged
    let mut cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            init_tracing(config::DEFAULT_LOG_LEVEL);
            return Err(e);
        }
    };

    // command-line overrides
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(user) = &cli.user {
        cfg.default_user = Some(user.clone());
    }

    init_tracing(&cfg.log_level);

    dispatch(&cli, &cfg)
}
