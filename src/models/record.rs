use super::history::History;
use super::parse_timestamp;
use crate::db::schema::RECORDS;
use crate::db::table::Entity;
use chrono::{DateTime, Local};
use rusqlite::Row;
use rusqlite::types::Value;
use serde::Serialize;

/// A welder's unit-of-work entry against an article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: Option<i64>,
    pub welder_id: i64,                         // soft reference → welders.id
    pub article: String,
    pub quantity: i64,
    pub total_hours: f64,                       // 0 on rows written before v3
    pub date: DateTime<Local>,                  // creation time
    pub last_updated: Option<DateTime<Local>>,  // absent on rows written before v3
    pub history: String,                        // serialized audit trail
}

impl Record {
    pub fn new(welder_id: i64, article: &str, quantity: i64, total_hours: f64) -> Self {
        let now = Local::now();
        Self {
            id: None,
            welder_id,
            article: article.to_string(),
            quantity,
            total_hours,
            date: now,
            last_updated: Some(now),
            history: String::new(),
        }
    }

    pub fn history(&self) -> History {
        History::parse(&self.history)
    }

    /// Append an audit entry and bump `last_updated`.
    pub fn touch(&mut self, action: &str, note: impl Into<String>) {
        let mut h = self.history();
        h.push(action, note);
        self.history = h.to_column();
        self.last_updated = Some(Local::now());
    }
}

impl Entity for Record {
    const TABLE: &'static str = RECORDS;
    const COLUMNS: &'static [&'static str] = &[
        "welder_id",
        "article",
        "quantity",
        "total_hours",
        "date",
        "last_updated",
        "history",
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let id: i64 = row.get("id")?;
        let date: String = row.get("date")?;
        let last_updated: Option<String> = row.get("last_updated")?;

        Ok(Self {
            id: Some(id),
            welder_id: row.get("welder_id")?,
            article: row.get("article")?,
            quantity: row.get("quantity")?,
            total_hours: row.get("total_hours")?,
            date: parse_timestamp(&date, RECORDS, id)?,
            last_updated: last_updated
                .as_deref()
                .map(|s| parse_timestamp(s, RECORDS, id))
                .transpose()?,
            history: row.get("history")?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            self.welder_id.into(),
            self.article.clone().into(),
            self.quantity.into(),
            self.total_hours.into(),
            self.date.to_rfc3339().into(),
            self.last_updated.map(|d| d.to_rfc3339()).into(),
            self.history.clone().into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;

    #[test]
    fn unreadable_date_names_the_row() {
        let store = Store::open_in_memory().unwrap();
        store.records().add(&Record::new(1, "ХТ52", 1, 8.0)).unwrap();
        store
            .conn()
            .execute(
                "INSERT INTO records (welder_id, article, quantity, date) VALUES (1, 'ХТ52', 2, '05.11.2023')",
                [],
            )
            .unwrap();

        let err = store.records().all().unwrap_err().to_string();
        assert!(err.contains("'05.11.2023' in records #2"), "{}", err);
        assert!(store.records().get(1).unwrap().is_some());
    }

    #[test]
    fn touch_extends_history() {
        let mut r = Record::new(3, "ХТ55", 2, 24.0);
        r.touch("created", "qty 2");
        r.touch("updated", "qty 3");
        let h = r.history();
        assert_eq!(h.entries().len(), 2);
        assert_eq!(h.entries()[1].action, "updated");
        assert!(r.last_updated.is_some());
    }
}
