use crate::cli::parser::{Commands, RecordAction};
use crate::config::Config;
use crate::core::dailies::DailyLogic;
use crate::core::records::{RecordChange, RecordLogic};
use crate::db::Store;
use crate::errors::{AppError, AppResult};
use crate::models::Record;
use crate::ui::messages::{confirm, header, info, success, warning};
use crate::utils::colors::{CYAN, GREY, RESET, colorize_optional};
use crate::utils::fmt_hours;
use crate::utils::table::{Column, TextTable};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Record { action } = cmd {
        let store = Store::open(&cfg.database, cfg)?;

        match action {
            RecordAction::Add {
                welder,
                article,
                quantity,
                hours,
                note,
            } => {
                let r = RecordLogic::create(
                    &store,
                    *welder,
                    article,
                    *quantity,
                    *hours,
                    note.as_deref(),
                )?;
                success(format!(
                    "Record #{} added: welder #{} {} x{} ({}).",
                    r.id.unwrap_or_default(),
                    r.welder_id,
                    r.article,
                    r.quantity,
                    fmt_hours(r.total_hours)
                ));
            }

            RecordAction::List { welder, article } => {
                let records = match (welder, article) {
                    (Some(w), Some(a)) => store
                        .records()
                        .where_eq("welder_id", *w)?
                        .into_iter()
                        .filter(|r| &r.article == a)
                        .collect(),
                    (Some(w), None) => store.records().where_eq("welder_id", *w)?,
                    (None, Some(a)) => store.records().where_eq("article", a.as_str())?,
                    (None, None) => store.records().all()?,
                };
                print_records(&store, &records, cfg)?;
            }

            RecordAction::Show { id } => {
                let r = store
                    .records()
                    .get(*id)?
                    .ok_or(AppError::RecordNotFound(*id))?;
                print_record(&store, &r, cfg)?;
            }

            RecordAction::Update {
                id,
                quantity,
                hours,
                note,
            } => {
                if quantity.is_none() && hours.is_none() && note.is_none() {
                    warning("Nothing to update: pass --quantity, --hours or --note.");
                    return Ok(());
                }
                let change = RecordChange {
                    quantity: *quantity,
                    total_hours: *hours,
                    note: note.clone(),
                };
                let r = RecordLogic::update(&store, *id, &change)?;
                success(format!(
                    "Record #{} updated: {} x{} ({}).",
                    id,
                    r.article,
                    r.quantity,
                    fmt_hours(r.total_hours)
                ));
            }

            RecordAction::Del { id, yes } => {
                if !*yes && !confirm(&format!("Delete record #{}?", id)) {
                    info("Operation cancelled.");
                    return Ok(());
                }
                let orphans = RecordLogic::delete(&store, *id)?;
                success(format!("Record #{} deleted.", id));
                if orphans > 0 {
                    warning(format!(
                        "{} daily allocation(s) still reference record #{}.",
                        orphans, id
                    ));
                }
            }
        }
    }

    Ok(())
}

fn welder_name(store: &Store, id: i64) -> AppResult<Option<String>> {
    Ok(store.welders().get(id)?.map(|w| w.name))
}

fn print_records(store: &Store, records: &[Record], cfg: &Config) -> AppResult<()> {
    if records.is_empty() {
        info("No records found.");
        return Ok(());
    }

    header("Records");
    let mut table = TextTable::new(vec![
        Column::new("ID", 5),
        Column::new("Welder", 20),
        Column::new("Article", 10),
        Column::new("Qty", 5),
        Column::new("Hours", 7),
        Column::new("Booked", 7),
        Column::new("Created", 16),
    ]);

    for r in records {
        let id = r.id.unwrap_or_default();
        let welder = welder_name(store, r.welder_id)?
            .map(|n| format!("{} (#{})", n, r.welder_id))
            .unwrap_or_else(|| format!("{GREY}#{} ?{RESET}", r.welder_id));
        let booked = RecordLogic::allocated_hours(store, id)?;

        table.add_row(vec![
            id.to_string(),
            welder,
            r.article.clone(),
            r.quantity.to_string(),
            fmt_hours(r.total_hours),
            fmt_hours(booked),
            r.date.format(&cfg.date_format).to_string(),
        ]);
    }

    print!("{}", table.render(&cfg.separator_char));
    Ok(())
}

fn print_record(store: &Store, r: &Record, cfg: &Config) -> AppResult<()> {
    let id = r.id.unwrap_or_default();
    header(format!("Record #{}", id));

    let welder = welder_name(store, r.welder_id)?;
    let last_updated = r
        .last_updated
        .map(|d| d.format(&cfg.date_format).to_string());

    println!(
        "{}• Welder:{} #{} {}",
        CYAN,
        RESET,
        r.welder_id,
        colorize_optional(welder.as_deref())
    );
    println!("{}• Article:{} {}", CYAN, RESET, r.article);
    println!("{}• Quantity:{} {}", CYAN, RESET, r.quantity);
    println!("{}• Hours:{} {}", CYAN, RESET, fmt_hours(r.total_hours));
    println!(
        "{}• Created:{} {}",
        CYAN,
        RESET,
        r.date.format(&cfg.date_format)
    );
    println!(
        "{}• Updated:{} {}",
        CYAN,
        RESET,
        colorize_optional(last_updated.as_deref())
    );

    let history = r.history();
    println!("{}• History:{}", CYAN, RESET);
    if history.is_empty() {
        println!("    {GREY}--{RESET}");
    }
    for e in history.entries() {
        let at = e
            .at
            .map(|d| d.format(&cfg.date_format).to_string())
            .unwrap_or_else(|| "?".to_string());
        println!("    {} {:<8} {}", at, e.action, e.note);
    }

    let dailies = DailyLogic::for_record(store, id)?;
    let booked: f64 = dailies.iter().map(|d| d.hours).sum();
    println!(
        "{}• Daily allocations:{} {} of {}",
        CYAN,
        RESET,
        fmt_hours(booked),
        fmt_hours(r.total_hours)
    );
    for d in &dailies {
        println!("    {}  {}", d.date_str(), fmt_hours(d.hours));
    }
    println!();

    Ok(())
}
