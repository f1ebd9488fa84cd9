use clap::{Parser, Subcommand};

/// Command-line interface definition for weldlog
/// CLI application to track welders' work with SQLite
#[derive(Parser)]
#[command(
    name = "weldlog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track welders' work records, production plans, time norms and daily hours using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

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

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with default values")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending schema migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,
    },

    /// Manage welders
    Welder {
        #[command(subcommand)]
        action: WelderAction,
    },

    /// Manage production plans
    Plan {
        #[command(subcommand)]
        action: PlanAction,
    },

    /// Manage article time norms
    Norm {
        #[command(subcommand)]
        action: NormAction,
    },

    /// Manage work records
    Record {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Manage daily hour allocations
    Daily {
        #[command(subcommand)]
        action: DailyAction,
    },
}

#[derive(Subcommand)]
pub enum WelderAction {
    /// Add a welder
    Add { name: String },

    /// List welders
    List,

    /// Rename a welder
    Rename { id: i64, name: String },

    /// Delete a welder (records referencing it are kept)
    Del {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum PlanAction {
    /// Create a plan for an article
    Add {
        article: String,

        /// Target quantity (ignored as a bound with --unlimited)
        #[arg(default_value_t = 0)]
        quantity: i64,

        #[arg(long, help = "No completion bound")]
        unlimited: bool,
    },

    /// List plans
    List {
        #[arg(long, help = "Only plans for this article")]
        article: Option<String>,
    },

    /// Record finished units on a plan (never decreases)
    Progress {
        id: i64,

        #[arg(long, conflicts_with = "set", help = "Add finished units")]
        add: Option<i64>,

        #[arg(long, help = "Set the completed count")]
        set: Option<i64>,
    },

    /// Delete a plan
    Del {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum NormAction {
    /// List norms
    List,

    /// Set the hours per unit for an article (creates it if missing)
    Set { article: String, time: f64 },

    /// Delete the norm of an article
    Del {
        article: String,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum RecordAction {
    /// Add a work record
    Add {
        /// Welder id
        #[arg(long)]
        welder: i64,

        #[arg(long)]
        article: String,

        #[arg(long, short = 'q')]
        quantity: i64,

        /// Total hours; defaults to quantity × article norm
        #[arg(long)]
        hours: Option<f64>,

        #[arg(long)]
        note: Option<String>,
    },

    /// List records
    List {
        #[arg(long, help = "Only records of this welder")]
        welder: Option<i64>,

        #[arg(long, help = "Only records for this article")]
        article: Option<String>,
    },

    /// Show one record with its history and daily allocations
    Show { id: i64 },

    /// Update quantity/hours of a record
    Update {
        id: i64,

        #[arg(long, short = 'q')]
        quantity: Option<i64>,

        #[arg(long)]
        hours: Option<f64>,

        #[arg(long)]
        note: Option<String>,
    },

    /// Delete a record (its daily allocations are kept)
    Del {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum DailyAction {
    /// Book hours of a record on a day
    Add {
        /// Record id
        #[arg(long)]
        record: i64,

        /// Day (YYYY-MM-DD or "today")
        date: String,

        hours: f64,
    },

    /// List allocations
    List {
        #[arg(long, conflicts_with = "welder", help = "Allocations of one record")]
        record: Option<i64>,

        #[arg(long, help = "Per-day totals of one welder")]
        welder: Option<i64>,

        #[arg(
            long,
            short,
            help = "Filter by year/month/day or a start:end range (with --welder)"
        )]
        period: Option<String>,
    },

    /// Delete an allocation
    Del { id: i64 },
}
