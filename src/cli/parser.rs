use clap::{Parser, Subcommand};

/// Command-line interface definition for wms
/// Work attendance tracking with SQLite
#[derive(Parser)]
#[command(
    name = "wms",
    version = env!("CARGO_PKG_VERSION"),
    about = "Work attendance tracker: clock in/out, daily disqualification of forgotten sessions, worked-time deltas",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Act as this user (e-mail); overrides `default_user` from the config
    #[arg(global = true, long = "user", short = 'u')]
    pub user: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity and ledger consistency")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "op", help = "Only rows of this operation (e.g. clock_out, disqualify)")]
        operation: Option<String>,
    },

    /// Provision and list users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Clock in (no-op when already clocked in)
    In,

    /// Clock out and record the interval (no-op when already clocked out)
    Out,

    /// List the current user's recorded entries
    Entries {
        #[arg(long = "json", help = "Print as JSON")]
        json: bool,
    },

    /// Show state, online count, and deltas for this month and today
    Status {
        #[arg(long = "json", help = "Print as JSON")]
        json: bool,
    },

    /// Count (or, for administrators, list) users currently clocked in
    Online {
        #[arg(long = "list", help = "List who is clocked in (admin only)")]
        list: bool,

        #[arg(long = "json", help = "Print as JSON")]
        json: bool,
    },

    /// Correct the interval of an entry (admin only)
    Edit {
        /// Entry id
        id: i64,

        #[arg(long = "from", help = "Start: unix seconds or 'YYYY-MM-DD HH:MM'")]
        from: String,

        #[arg(long = "to", help = "End: unix seconds or 'YYYY-MM-DD HH:MM'")]
        to: String,
    },

    /// Delete an entry (admin only)
    Del {
        /// Entry id
        id: i64,

        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Run one disqualification sweep now
    Sweep,

    /// Run the daily disqualification scheduler in the foreground
    Daemon,
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a user (starts clocked out)
    Add {
        email: String,

        #[arg(long = "admin", help = "Grant administrator rights")]
        admin: bool,
    },

    /// List users
    List,
}
