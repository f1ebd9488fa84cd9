use crate::cli::parser::{Commands, DailyAction};
use crate::config::Config;
use crate::core::dailies::{DailyLogic, MAX_HOURS_PER_DAY};
use crate::db::Store;
use crate::errors::{AppError, AppResult};
use crate::models::DailyAllocation;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::colors::{GREY, RESET, colorize_hours};
use crate::utils::date::{parse_date, period_bounds, today};
use crate::utils::fmt_hours;
use crate::utils::table::{Column, TextTable};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Daily { action } = cmd {
        let store = Store::open(&cfg.database, cfg)?;

        match action {
            DailyAction::Add {
                record,
                date,
                hours,
            } => {
                let day = parse_date(date).ok_or_else(|| AppError::InvalidDate(date.clone()))?;
                let a = DailyLogic::allocate(&store, *record, day, *hours)?;

                success(format!(
                    "Booked {} on {} for record #{} ({}).",
                    fmt_hours(a.daily.hours),
                    a.daily.date_str(),
                    record,
                    a.daily.article
                ));
                if a.exceeds_record() {
                    warning(format!(
                        "Record #{} now has {} booked, above its {}.",
                        record,
                        fmt_hours(a.record_allocated),
                        fmt_hours(a.record_total)
                    ));
                }
            }

            DailyAction::List {
                record,
                welder,
                period,
            } => {
                if let Some(r) = record {
                    let rows = DailyLogic::for_record(&store, *r)?;
                    print_rows(&rows, cfg);
                } else if let Some(w) = welder {
                    let (from, to) = match period {
                        Some(p) => period_bounds(p).map_err(AppError::InvalidDate)?,
                        None => {
                            let t = today();
                            period_bounds(&t.format("%Y-%m").to_string())
                                .map_err(AppError::InvalidDate)?
                        }
                    };
                    print_totals(&store, *w, from, to, cfg)?;
                } else {
                    let mut rows = store.dailies().all()?;
                    if let Some(p) = period {
                        let (from, to) = period_bounds(p).map_err(AppError::InvalidDate)?;
                        rows.retain(|d| d.date >= from && d.date <= to);
                    }
                    print_rows(&rows, cfg);
                }
            }

            DailyAction::Del { id } => {
                DailyLogic::delete(&store, *id)?;
                success(format!("Daily allocation #{} deleted.", id));
            }
        }
    }

    Ok(())
}

fn print_rows(rows: &[DailyAllocation], cfg: &Config) {
    if rows.is_empty() {
        info("No daily allocations found.");
        return;
    }

    header("Daily allocations");
    let mut table = TextTable::new(vec![
        Column::new("ID", 5),
        Column::new("Date", 10),
        Column::new("Welder", 6),
        Column::new("Record", 6),
        Column::new("Article", 10),
        Column::new("Hours", 6),
    ]);
    for d in rows {
        table.add_row(vec![
            d.id.unwrap_or_default().to_string(),
            d.date_str(),
            d.welder_id.to_string(),
            d.record_id
                .map(|r| r.to_string())
                .unwrap_or_else(|| format!("{GREY}--{RESET}")),
            d.article.clone(),
            fmt_hours(d.hours),
        ]);
    }
    print!("{}", table.render(&cfg.separator_char));
}

fn print_totals(
    store: &Store,
    welder_id: i64,
    from: chrono::NaiveDate,
    to: chrono::NaiveDate,
    cfg: &Config,
) -> AppResult<()> {
    let totals = DailyLogic::day_totals(store, welder_id, from, to)?;
    if totals.is_empty() {
        info(format!(
            "No hours booked for welder #{} between {} and {}.",
            welder_id, from, to
        ));
        return Ok(());
    }

    header(format!("Welder #{}: {} → {}", welder_id, from, to));
    let mut table = TextTable::new(vec![Column::new("Date", 10), Column::new("Hours", 6)]);
    let mut sum = 0.0;
    for (day, hours) in &totals {
        sum += hours;
        table.add_row(vec![
            day.format("%Y-%m-%d").to_string(),
            colorize_hours(*hours, MAX_HOURS_PER_DAY),
        ]);
    }
    print!("{}", table.render(&cfg.separator_char));
    println!("Total: {}", fmt_hours(sum));
    Ok(())
}
