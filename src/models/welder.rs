use crate::db::schema::WELDERS;
use crate::db::table::Entity;
use rusqlite::Row;
use rusqlite::types::Value;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Welder {
    pub id: Option<i64>,
    pub name: String,
}

impl Welder {
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.trim().to_string(),
        }
    }
}

impl Entity for Welder {
    const TABLE: &'static str = WELDERS;
    const COLUMNS: &'static [&'static str] = &["name"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![self.name.clone().into()]
    }
}
