use crate::db::Store;
use crate::db::schema::RECORDS;
use crate::errors::{AppError, AppResult};
use crate::models::Record;
use crate::utils::fmt_hours;

/// Fields to change on an existing record; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct RecordChange {
    pub quantity: Option<i64>,
    pub total_hours: Option<f64>,
    pub note: Option<String>,
}

pub struct RecordLogic;

impl RecordLogic {
    /// Hours for `quantity` units of `article` according to the norms table.
    pub fn norm_hours(store: &Store, article: &str, quantity: i64) -> AppResult<f64> {
        let norm = store
            .norms()
            .first_where("article", article)?
            .ok_or_else(|| AppError::NormNotFound(article.to_string()))?;
        Ok(norm.hours_for(quantity))
    }

    /// Create a record. Without explicit hours, they come from the article norm.
    pub fn create(
        store: &Store,
        welder_id: i64,
        article: &str,
        quantity: i64,
        hours: Option<f64>,
        note: Option<&str>,
    ) -> AppResult<Record> {
        check_quantity(quantity)?;
        if store.welders().get(welder_id)?.is_none() {
            return Err(AppError::WelderNotFound(welder_id));
        }

        let article = article.trim();
        let total_hours = match hours {
            Some(h) => check_hours(h)?,
            None => Self::norm_hours(store, article, quantity)?,
        };

        let mut record = Record::new(welder_id, article, quantity, total_hours);
        record.touch(
            "created",
            describe(quantity, total_hours, note),
        );
        record.last_updated = Some(record.date);

        record.id = Some(store.records().add(&record)?);
        store.log(
            "add",
            RECORDS,
            &format!(
                "Record #{} welder #{} {} x{} ({})",
                record.id.unwrap_or_default(),
                welder_id,
                record.article,
                quantity,
                fmt_hours(total_hours)
            ),
        );
        Ok(record)
    }

    /// Apply `change`; every update bumps `last_updated` and extends the history.
    /// A new quantity without explicit hours recomputes hours from the norm when
    /// one exists.
    pub fn update(store: &Store, id: i64, change: &RecordChange) -> AppResult<Record> {
        let mut record = store
            .records()
            .get(id)?
            .ok_or(AppError::RecordNotFound(id))?;

        if let Some(q) = change.quantity {
            check_quantity(q)?;
            record.quantity = q;
        }

        if let Some(h) = change.total_hours {
            record.total_hours = check_hours(h)?;
        } else if change.quantity.is_some() {
            match Self::norm_hours(store, &record.article, record.quantity) {
                Ok(h) => record.total_hours = h,
                Err(AppError::NormNotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        record.touch(
            "updated",
            describe(record.quantity, record.total_hours, change.note.as_deref()),
        );
        store.records().update(&record)?;
        store.log("edit", RECORDS, &format!("Updated record #{}", id));
        Ok(record)
    }

    /// Delete a record. Daily allocations that point at it stay in place;
    /// returns how many of them there are.
    pub fn delete(store: &Store, id: i64) -> AppResult<usize> {
        if !store.records().delete(id)? {
            return Err(AppError::RecordNotFound(id));
        }
        let orphans = store.dailies().where_eq("record_id", id)?.len();
        store.log("del", RECORDS, &format!("Deleted record #{}", id));
        Ok(orphans)
    }

    /// Sum of daily hours booked against the record.
    pub fn allocated_hours(store: &Store, id: i64) -> AppResult<f64> {
        Ok(store
            .dailies()
            .where_eq("record_id", id)?
            .iter()
            .map(|d| d.hours)
            .sum())
    }
}

fn check_quantity(q: i64) -> AppResult<()> {
    if q <= 0 {
        return Err(AppError::InvalidQuantity(format!(
            "quantity must be positive, got {}",
            q
        )));
    }
    Ok(())
}

fn check_hours(h: f64) -> AppResult<f64> {
    if !h.is_finite() || h < 0.0 {
        return Err(AppError::InvalidHours(h.to_string()));
    }
    Ok(h)
}

fn describe(quantity: i64, hours: f64, note: Option<&str>) -> String {
    match note.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) => format!("qty {}, {}: {}", quantity, fmt_hours(hours), n),
        None => format!("qty {}, {}", quantity, fmt_hours(hours)),
    }
}
