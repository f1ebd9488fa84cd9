use crate::db::Store;
use crate::db::schema::{DAILIES, NORMS, PLANS, RECORDS, WELDERS};
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

#[derive(Debug, Clone, PartialEq)]
pub struct DbStats {
    pub schema_version: u32,
    pub supported_version: u32,
    /// (table, rows)
    pub counts: Vec<(&'static str, i64)>,
    pub first_day: Option<String>,
    pub last_day: Option<String>,
    pub allocated_hours: f64,
}

pub fn collect(store: &Store) -> AppResult<DbStats> {
    let counts = vec![
        (WELDERS, store.welders().count()?),
        (PLANS, store.plans().count()?),
        (RECORDS, store.records().count()?),
        (NORMS, store.norms().count()?),
        (DAILIES, store.dailies().count()?),
    ];

    let conn = store.conn();
    let first_day: Option<String> = conn
        .query_row(
            "SELECT date_str FROM dailies ORDER BY date_str ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    let last_day: Option<String> = conn
        .query_row(
            "SELECT date_str FROM dailies ORDER BY date_str DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    let allocated_hours: f64 =
        conn.query_row("SELECT IFNULL(SUM(hours), 0) FROM dailies", [], |row| {
            row.get(0)
        })?;

    Ok(DbStats {
        schema_version: store.schema_version()?,
        supported_version: store.registry().latest_version(),
        counts,
        first_day,
        last_day,
        allocated_hours,
    })
}

pub fn print_db_info(store: &Store, db_path: &str) -> AppResult<()> {
    let stats = collect(store)?;
    println!();

    //
    // 1) FILE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);
    println!(
        "{}• Schema version:{} {}{}{} (supported: {})",
        CYAN, RESET, GREEN, stats.schema_version, RESET, stats.supported_version
    );

    //
    // 2) ROWS PER TABLE
    //
    println!("{}• Rows:{}", CYAN, RESET);
    for (table, n) in &stats.counts {
        println!("    {:<8} {}{}{}", table, GREEN, n, RESET);
    }

    //
    // 3) DAILY RANGE
    //
    let dash = format!("{GREY}--{RESET}");
    println!("{}• Daily allocations:{}", CYAN, RESET);
    println!(
        "    from: {}",
        stats.first_day.clone().unwrap_or_else(|| dash.clone())
    );
    println!("    to:   {}", stats.last_day.clone().unwrap_or(dash));
    println!("    hours: {:.1}", stats.allocated_hours);

    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyAllocation, Welder};
    use chrono::NaiveDate;

    #[test]
    fn counts_fresh_store() {
        let store = Store::open_in_memory().unwrap();
        let stats = collect(&store).unwrap();

        assert_eq!(stats.schema_version, 4);
        assert_eq!(stats.supported_version, 4);
        assert_eq!(
            stats.counts,
            vec![
                (WELDERS, 0),
                (PLANS, 0),
                (RECORDS, 0),
                (NORMS, 5),
                (DAILIES, 0)
            ]
        );
        assert!(stats.first_day.is_none());
        assert_eq!(stats.allocated_hours, 0.0);
    }

    #[test]
    fn daily_range_and_hours() {
        let store = Store::open_in_memory().unwrap();
        let w = store.welders().add(&Welder::new("Sidorov")).unwrap();
        let d1 = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        store
            .dailies()
            .add(&DailyAllocation::new(w, None, "ХТ52", d2, 6.0))
            .unwrap();
        store
            .dailies()
            .add(&DailyAllocation::new(w, None, "ХТ52", d1, 2.5))
            .unwrap();

        let stats = collect(&store).unwrap();
        assert_eq!(stats.first_day.as_deref(), Some("2024-03-02"));
        assert_eq!(stats.last_day.as_deref(), Some("2024-03-05"));
        assert_eq!(stats.allocated_hours, 8.5);
    }
}
