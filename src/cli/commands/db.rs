use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::{Store, stats};
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    {
        // Opening the store already runs pending migrations
        let store = Store::open(&cfg.database, cfg)?;

        //
        // 1) MIGRATE
        //
        if *migrate {
            println!("{}▶ Running migrations…{}", CYAN, RESET);
            let report = store.migration();
            if report.is_noop() {
                println!(
                    "{}✔ Schema already at v{}, nothing to do.{}\n",
                    GREEN, report.to, RESET
                );
            } else {
                println!(
                    "{}✔ Migrated v{} → v{} (steps: {:?}).{}\n",
                    GREEN, report.from, report.to, report.applied, RESET
                );
            }
        }

        //
        // 2) INFO
        //
        if *info {
            stats::print_db_info(&store, &cfg.database)?;
        }

        //
        // 3) CHECK
        //
        if *check {
            println!("{}▶ Running integrity check…{}", CYAN, RESET);

            let integrity: String = store
                .conn()
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
            } else {
                println!("{}✘ Integrity check failed:{} {}\n", RED, RESET, integrity);
            }
        }

        //
        // 4) VACUUM
        //
        if *vacuum {
            println!("{}▶ Running VACUUM…{}", CYAN, RESET);
            store.conn().execute_batch("VACUUM;")?;
            println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }
    }

    Ok(())
}
