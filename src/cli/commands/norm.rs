use crate::cli::parser::{Commands, NormAction};
use crate::config::Config;
use crate::core::norms::NormLogic;
use crate::db::Store;
use crate::errors::AppResult;
use crate::ui::messages::{confirm, header, info, success};
use crate::utils::fmt_hours;
use crate::utils::table::{Column, TextTable};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Norm { action } = cmd {
        let store = Store::open(&cfg.database, cfg)?;

        match action {
            NormAction::List => {
                let norms = store.norms().all()?;
                if norms.is_empty() {
                    info("No norms defined.");
                    return Ok(());
                }

                header("Norms (hours per unit)");
                let mut table =
                    TextTable::new(vec![Column::new("Article", 12), Column::new("Time", 8)]);
                for n in &norms {
                    table.add_row(vec![n.article.clone(), fmt_hours(n.time)]);
                }
                print!("{}", table.render(&cfg.separator_char));
            }

            NormAction::Set { article, time } => match NormLogic::set(&store, article, *time)? {
                (n, Some(prev)) => success(format!(
                    "Norm {} updated: {} → {}",
                    n.article,
                    fmt_hours(prev),
                    fmt_hours(n.time)
                )),
                (n, None) => success(format!("Norm {} added: {}", n.article, fmt_hours(n.time))),
            },

            NormAction::Del { article, yes } => {
                if !*yes && !confirm(&format!("Delete the norm of {}?", article)) {
                    info("Operation cancelled.");
                    return Ok(());
                }
                NormLogic::delete(&store, article)?;
                success(format!("Norm {} deleted.", article));
            }
        }
    }

    Ok(())
}
