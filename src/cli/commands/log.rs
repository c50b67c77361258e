use crate::cli::parser::Commands;
use crate::cli::commands::open_pool;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log {
        print: true,
        operation,
    } = cmd
    {
        let pool = open_pool(cfg)?;
        LogLogic::print_log(&pool, operation.as_deref())?;
    }

    Ok(())
}
