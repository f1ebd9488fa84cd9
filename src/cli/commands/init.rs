use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::Store;
use crate::db::seed::SeedOutcome;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::path::resolve_db_path;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the SQLite database, migrated to the latest schema
///  - the reference norms, when the table is empty
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.as_deref().map(resolve_db_path), cli.test)?;

    println!("⚙️  Initializing weldlog…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", &cfg.database);

    let store = Store::open(&cfg.database, &cfg)?;
    let report = store.migration();

    if report.is_noop() {
        info(format!("Schema already at v{}", report.to));
    } else {
        success(format!(
            "Schema v{} → v{} ({} step(s))",
            report.from,
            report.to,
            report.applied.len()
        ));
    }

    match store.seed() {
        Some(SeedOutcome::Inserted(n)) => success(format!("Inserted {} reference norms", n)),
        Some(SeedOutcome::AlreadyPresent(n)) => info(format!("Norms table already holds {} rows", n)),
        None => {}
    }

    store.log(
        "init",
        "database",
        &format!("Database initialized at {}", &cfg.database),
    );

    println!("🎉 weldlog initialization completed!");
    Ok(())
}
