use crate::db::schema::PLANS;
use crate::db::table::Entity;
use rusqlite::Row;
use rusqlite::types::Value;
use serde::Serialize;

/// Production target for an article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub id: Option<i64>,
    pub article: String,
    pub quantity: i64,
    pub completed: i64,
    /// When set, `quantity` is not a completion bound.
    pub is_unlimited: bool,
}

impl Plan {
    pub fn new(article: &str, quantity: i64, is_unlimited: bool) -> Self {
        Self {
            id: None,
            article: article.to_string(),
            quantity,
            completed: 0,
            is_unlimited,
        }
    }

    /// Units still to produce; `None` for unlimited plans.
    pub fn remaining(&self) -> Option<i64> {
        if self.is_unlimited {
            None
        } else {
            Some((self.quantity - self.completed).max(0))
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.is_unlimited && self.completed >= self.quantity
    }
}

impl Entity for Plan {
    const TABLE: &'static str = PLANS;
    const COLUMNS: &'static [&'static str] = &["article", "quantity", "completed", "is_unlimited"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            article: row.get("article")?,
            quantity: row.get("quantity")?,
            completed: row.get("completed")?,
            is_unlimited: row.get("is_unlimited")?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            self.article.clone().into(),
            self.quantity.into(),
            self.completed.into(),
            self.is_unlimited.into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_and_completion() {
        let mut p = Plan::new("ХТ637", 10, false);
        assert_eq!(p.remaining(), Some(10));
        p.completed = 12;
        assert_eq!(p.remaining(), Some(0));
        assert!(p.is_complete());

        let u = Plan {
            completed: 500,
            ..Plan::new("ХТ55", 1, true)
        };
        assert_eq!(u.remaining(), None);
        assert!(!u.is_complete());
    }
}
