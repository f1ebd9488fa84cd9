use crate::cli::parser::{Commands, WelderAction};
use crate::config::Config;
use crate::core::welders::WelderLogic;
use crate::db::Store;
use crate::errors::AppResult;
use crate::ui::messages::{confirm, header, info, success, warning};
use crate::utils::table::{Column, TextTable};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Welder { action } = cmd {
        let store = Store::open(&cfg.database, cfg)?;

        match action {
            WelderAction::Add { name } => {
                let w = WelderLogic::add(&store, name)?;
                success(format!(
                    "Welder #{} '{}' added.",
                    w.id.unwrap_or_default(),
                    w.name
                ));
            }

            WelderAction::List => {
                let welders = store.welders().all()?;
                if welders.is_empty() {
                    info("No welders yet.");
                    return Ok(());
                }

                header("Welders");
                let mut table = TextTable::new(vec![
                    Column::new("ID", 5),
                    Column::new("Name", 30),
                    Column::new("Records", 7),
                ]);
                for w in &welders {
                    let id = w.id.unwrap_or_default();
                    let records = store.records().where_eq("welder_id", id)?.len();
                    table.add_row(vec![id.to_string(), w.name.clone(), records.to_string()]);
                }
                print!("{}", table.render(&cfg.separator_char));
            }

            WelderAction::Rename { id, name } => {
                let w = WelderLogic::rename(&store, *id, name)?;
                success(format!("Welder #{} renamed to '{}'.", id, w.name));
            }

            WelderAction::Del { id, yes } => {
                if !*yes && !confirm(&format!("Delete welder #{}? This action is irreversible.", id))
                {
                    info("Operation cancelled.");
                    return Ok(());
                }

                let orphans = WelderLogic::delete(&store, *id)?;
                success(format!("Welder #{} deleted.", id));
                if orphans > 0 {
                    warning(format!(
                        "{} record(s) still reference welder #{}.",
                        orphans, id
                    ));
                }
            }
        }
    }

    Ok(())
}
