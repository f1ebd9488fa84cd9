use super::parse_day;
use crate::db::schema::DAILIES;
use crate::db::table::Entity;
use chrono::NaiveDate;
use rusqlite::Row;
use rusqlite::types::Value;
use serde::Serialize;

/// Hours a welder spent on an article on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAllocation {
    pub id: Option<i64>,
    pub welder_id: i64,         // soft reference → welders.id
    pub record_id: Option<i64>, // soft reference → records.id, absent before v4
    pub article: String,
    pub date: NaiveDate,        // ⇔ dailies.date_str (TEXT "YYYY-MM-DD")
    pub hours: f64,
}

impl DailyAllocation {
    pub fn new(
        welder_id: i64,
        record_id: Option<i64>,
        article: &str,
        date: NaiveDate,
        hours: f64,
    ) -> Self {
        Self {
            id: None,
            welder_id,
            record_id,
            article: article.to_string(),
            date,
            hours,
        }
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

impl Entity for DailyAllocation {
    const TABLE: &'static str = DAILIES;
    const COLUMNS: &'static [&'static str] =
        &["welder_id", "record_id", "article", "date_str", "hours"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let id: i64 = row.get("id")?;
        let date_str: String = row.get("date_str")?;

        Ok(Self {
            id: Some(id),
            welder_id: row.get("welder_id")?,
            record_id: row.get("record_id")?,
            article: row.get("article")?,
            date: parse_day(&date_str, DAILIES, id)?,
            hours: row.get("hours")?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            self.welder_id.into(),
            self.record_id.into(),
            self.article.clone().into(),
            self.date_str().into(),
            self.hours.into(),
        ]
    }
}
