use crate::cli::commands::open_pool;
use crate::cli::parser::{Commands, UserAction};
use crate::config::Config;
use crate::core::clock::{Clock, SystemClock};
use crate::core::identity::UserLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::User { action } = cmd {
        let mut pool = open_pool(cfg)?;

        match action {
            UserAction::Add { email, admin } => {
                let uid = UserLogic::provision(&mut pool, email, *admin, SystemClock.now_secs())?;
                let role = if *admin { "administrator" } else { "user" };
                success(format!("Created {} {} (id {})", role, email.trim(), uid));
            }
            UserAction::List => {
                let users = UserLogic::list(&pool)?;
                if users.is_empty() {
                    info("No users yet. Create one with `wms user add <email>`.");
                    return Ok(());
                }

                let mut table = Table::new(vec![
                    Column::new("ID", 3),
                    Column::new("EMAIL", 10),
                    Column::new("ADMIN", 5),
                ]);
                for u in users {
                    table.add_row(vec![
                        u.id.to_string(),
                        u.email,
                        if u.admin { "yes".into() } else { "no".into() },
                    ]);
                }
                print!("{}", table.render());
            }
        }
    }

    Ok(())
}
