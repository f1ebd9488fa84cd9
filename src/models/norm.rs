use crate::db::schema::NORMS;
use crate::db::table::Entity;
use rusqlite::Row;
use rusqlite::types::Value;
use serde::Serialize;

/// Normative hours needed to produce one unit of an article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Norm {
    pub id: Option<i64>,
    pub article: String,
    pub time: f64,
}

impl Norm {
    pub fn new(article: &str, time: f64) -> Self {
        Self {
            id: None,
            article: article.to_string(),
            time,
        }
    }

    /// Expected hours for `quantity` units.
    pub fn hours_for(&self, quantity: i64) -> f64 {
        self.time * quantity as f64
    }
}

impl Entity for Norm {
    const TABLE: &'static str = NORMS;
    const COLUMNS: &'static [&'static str] = &["article", "time"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            article: row.get("article")?,
            time: row.get("time")?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![self.article.clone().into(), self.time.into()]
    }
}
