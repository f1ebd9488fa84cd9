use crate::cli::parser::{Commands, PlanAction};
use crate::config::Config;
use crate::core::plans::PlanLogic;
use crate::db::Store;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{confirm, header, info, success};
use crate::utils::colors::{RESET, color_for_progress};
use crate::utils::formatting::fmt_progress;
use crate::utils::table::{Column, TextTable};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Plan { action } = cmd {
        let store = Store::open(&cfg.database, cfg)?;

        match action {
            PlanAction::Add {
                article,
                quantity,
                unlimited,
            } => {
                let p = PlanLogic::create(&store, article, *quantity, *unlimited)?;
                success(format!(
                    "Plan #{} for {} created ({}).",
                    p.id.unwrap_or_default(),
                    p.article,
                    fmt_progress(p.completed, p.quantity, p.is_unlimited)
                ));
            }

            PlanAction::List { article } => {
                let plans = match article {
                    Some(a) => store.plans().where_eq("article", a.as_str())?,
                    None => store.plans().all()?,
                };
                if plans.is_empty() {
                    info("No plans found.");
                    return Ok(());
                }

                header("Plans");
                let mut table = TextTable::new(vec![
                    Column::new("ID", 5),
                    Column::new("Article", 12),
                    Column::new("Progress", 12),
                    Column::new("Remaining", 9),
                ]);
                for p in &plans {
                    let color = color_for_progress(p.completed, p.quantity, p.is_unlimited);
                    table.add_row(vec![
                        p.id.unwrap_or_default().to_string(),
                        p.article.clone(),
                        format!(
                            "{}{}{}",
                            color,
                            fmt_progress(p.completed, p.quantity, p.is_unlimited),
                            RESET
                        ),
                        p.remaining()
                            .map(|r| r.to_string())
                            .unwrap_or_else(|| "∞".to_string()),
                    ]);
                }
                print!("{}", table.render(&cfg.separator_char));
            }

            PlanAction::Progress { id, add, set } => {
                let p = match (add, set) {
                    (Some(delta), None) => PlanLogic::add_completed(&store, *id, *delta)?,
                    (None, Some(value)) => PlanLogic::set_completed(&store, *id, *value)?,
                    _ => {
                        return Err(AppError::InvalidQuantity(
                            "use either --add <N> or --set <N>".into(),
                        ));
                    }
                };
                success(format!(
                    "Plan #{} ({}): {}{}",
                    id,
                    p.article,
                    fmt_progress(p.completed, p.quantity, p.is_unlimited),
                    if p.is_complete() { " (done)" } else { "" }
                ));
            }

            PlanAction::Del { id, yes } => {
                if !*yes && !confirm(&format!("Delete plan #{}?", id)) {
                    info("Operation cancelled.");
                    return Ok(());
                }
                PlanLogic::delete(&store, *id)?;
                success(format!("Plan #{} deleted.", id));
            }
        }
    }

    Ok(())
}
