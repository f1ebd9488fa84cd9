use crate::db::Store;
use crate::db::schema::DAILIES;
use crate::errors::{AppError, AppResult};
use crate::models::DailyAllocation;
use crate::utils::fmt_hours;
use chrono::NaiveDate;

pub const MAX_HOURS_PER_DAY: f64 = 24.0;

/// Result of booking hours against a record.
#[derive(Debug, Clone)]
pub struct Allocation {
    pub daily: DailyAllocation,
    /// Hours booked on the record after this allocation.
    pub record_allocated: f64,
    /// The record's `total_hours`.
    pub record_total: f64,
}

impl Allocation {
    pub fn exceeds_record(&self) -> bool {
        self.record_allocated > self.record_total + f64::EPSILON
    }
}

pub struct DailyLogic;

impl DailyLogic {
    /// Book `hours` of a record's work on `date`. Welder and article are taken
    /// from the record. A welder's day can not exceed 24 hours in total.
    pub fn allocate(
        store: &Store,
        record_id: i64,
        date: NaiveDate,
        hours: f64,
    ) -> AppResult<Allocation> {
        if !hours.is_finite() || hours <= 0.0 || hours > MAX_HOURS_PER_DAY {
            return Err(AppError::InvalidHours(format!(
                "{} (expected 0 < hours ≤ {})",
                hours, MAX_HOURS_PER_DAY
            )));
        }

        let record = store
            .records()
            .get(record_id)?
            .ok_or(AppError::RecordNotFound(record_id))?;

        let booked = Self::welder_day_total(store, record.welder_id, date)?;
        if booked + hours > MAX_HOURS_PER_DAY {
            return Err(AppError::InvalidHours(format!(
                "welder #{} already has {} on {}, {} more would exceed {}",
                record.welder_id,
                fmt_hours(booked),
                date,
                fmt_hours(hours),
                fmt_hours(MAX_HOURS_PER_DAY)
            )));
        }

        let mut daily = DailyAllocation::new(
            record.welder_id,
            Some(record_id),
            &record.article,
            date,
            hours,
        );
        daily.id = Some(store.dailies().add(&daily)?);

        store.log(
            "add",
            DAILIES,
            &format!(
                "{} on {} for record #{} (welder #{})",
                fmt_hours(hours),
                daily.date_str(),
                record_id,
                record.welder_id
            ),
        );

        let record_allocated = crate::core::records::RecordLogic::allocated_hours(store, record_id)?;
        Ok(Allocation {
            daily,
            record_allocated,
            record_total: record.total_hours,
        })
    }

    pub fn for_record(store: &Store, record_id: i64) -> AppResult<Vec<DailyAllocation>> {
        store.dailies().where_eq("record_id", record_id)
    }

    /// Hours already booked for a welder on one day.
    pub fn welder_day_total(store: &Store, welder_id: i64, date: NaiveDate) -> AppResult<f64> {
        let total: f64 = store.conn().query_row(
            "SELECT IFNULL(SUM(hours), 0) FROM dailies WHERE welder_id = ?1 AND date_str = ?2",
            rusqlite::params![welder_id, date.format("%Y-%m-%d").to_string()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Per-day hour totals for a welder within `[from, to]`, oldest first.
    pub fn day_totals(
        store: &Store,
        welder_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<(NaiveDate, f64)>> {
        let mut stmt = store.conn().prepare_cached(
            "SELECT date_str, SUM(hours) FROM dailies
             WHERE welder_id = ?1 AND date_str BETWEEN ?2 AND ?3
             GROUP BY date_str
             ORDER BY date_str ASC",
        )?;

        let rows = stmt.query_map(
            rusqlite::params![
                welder_id,
                from.format("%Y-%m-%d").to_string(),
                to.format("%Y-%m-%d").to_string()
            ],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)),
        )?;

        let mut out = Vec::new();
        for r in rows {
            let (day, hours) = r?;
            let date = NaiveDate::parse_from_str(&day, "%Y-%m-%d")
                .map_err(|_| AppError::InvalidDate(day.clone()))?;
            out.push((date, hours));
        }
        Ok(out)
    }

    pub fn delete(store: &Store, id: i64) -> AppResult<()> {
        if !store.dailies().delete(id)? {
            return Err(AppError::Other(format!("Daily allocation #{} not found", id)));
        }
        store.log("del", DAILIES, &format!("Deleted daily allocation #{}", id));
        Ok(())
    }
}
