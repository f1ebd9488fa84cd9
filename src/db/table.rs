//! Generic table handle used by the store facade.
//!
//! A `Table<T>` is a thin pass-through to SQLite for one entity type: plain
//! CRUD plus equality lookups on fields the schema registry declares as
//! indexed. Soft references (welder_id, record_id, article) are never checked
//! here.

use crate::db::schema::SchemaRegistry;
use crate::errors::{AppError, AppResult};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params_from_iter};
use std::marker::PhantomData;

/// A row type stored in one of the registry tables.
pub trait Entity: Sized {
    const TABLE: &'static str;

    /// Non-primary columns in bind order, matching `to_values`.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> Option<i64>;

    fn from_row(row: &Row) -> rusqlite::Result<Self>;

    fn to_values(&self) -> Vec<Value>;
}

pub struct Table<'a, T: Entity> {
    conn: &'a Connection,
    registry: &'a SchemaRegistry,
    _marker: PhantomData<T>,
}

impl<'a, T: Entity> Table<'a, T> {
    pub fn new(conn: &'a Connection, registry: &'a SchemaRegistry) -> Self {
        Self {
            conn,
            registry,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        T::TABLE
    }

    fn insert_sql() -> String {
        let placeholders: Vec<String> = (1..=T::COLUMNS.len()).map(|i| format!("?{}", i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            T::TABLE,
            T::COLUMNS.join(", "),
            placeholders.join(", ")
        )
    }

    /// Insert a new row; the id on `item` is ignored and a fresh one returned.
    pub fn add(&self, item: &T) -> AppResult<i64> {
        let mut stmt = self.conn.prepare_cached(&Self::insert_sql())?;
        stmt.execute(params_from_iter(item.to_values()))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert all rows in a single transaction.
    pub fn bulk_add(&self, items: &[T]) -> AppResult<Vec<i64>> {
        let tx = self.conn.unchecked_transaction()?;
        let mut ids = Vec::with_capacity(items.len());
        {
            let mut stmt = tx.prepare_cached(&Self::insert_sql())?;
            for item in items {
                stmt.execute(params_from_iter(item.to_values()))?;
                ids.push(tx.last_insert_rowid());
            }
        }
        tx.commit()?;
        Ok(ids)
    }

    pub fn get(&self, id: i64) -> AppResult<Option<T>> {
        let sql = format!("SELECT * FROM {} WHERE id = ?1", T::TABLE);
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let found = stmt.query_row([id], |row| T::from_row(row)).optional()?;
        Ok(found)
    }

    /// Overwrite the row identified by `item.id()`.
    /// Returns false when the item has no id or no such row exists.
    pub fn update(&self, item: &T) -> AppResult<bool> {
        let Some(id) = item.id() else {
            return Ok(false);
        };

        let assignments: Vec<String> = T::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{} = ?{}", c, i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            T::TABLE,
            assignments.join(", "),
            T::COLUMNS.len() + 1
        );

        let mut values = item.to_values();
        values.push(Value::Integer(id));

        let mut stmt = self.conn.prepare_cached(&sql)?;
        let changed = stmt.execute(params_from_iter(values))?;
        Ok(changed > 0)
    }

    pub fn delete(&self, id: i64) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", T::TABLE);
        let changed = self.conn.execute(&sql, [id])?;
        Ok(changed > 0)
    }

    /// Delete every row, returning how many were removed.
    pub fn clear(&self) -> AppResult<usize> {
        let sql = format!("DELETE FROM {}", T::TABLE);
        Ok(self.conn.execute(&sql, [])?)
    }

    pub fn all(&self) -> AppResult<Vec<T>> {
        let sql = format!("SELECT * FROM {} ORDER BY id ASC", T::TABLE);
        self.collect(&sql, [])
    }

    pub fn count(&self) -> AppResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", T::TABLE);
        Ok(self.conn.query_row(&sql, [], |row| row.get(0))?)
    }

    /// Rows whose indexed `field` equals `value`, by id.
    pub fn where_eq<V: ToSql>(&self, field: &str, value: V) -> AppResult<Vec<T>> {
        self.check_indexed(field)?;
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?1 ORDER BY id ASC",
            T::TABLE,
            field
        );
        self.collect(&sql, [value])
    }

    pub fn first_where<V: ToSql>(&self, field: &str, value: V) -> AppResult<Option<T>> {
        self.check_indexed(field)?;
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?1 ORDER BY id ASC LIMIT 1",
            T::TABLE,
            field
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let found = stmt.query_row([value], |row| T::from_row(row)).optional()?;
        Ok(found)
    }

    fn check_indexed(&self, field: &str) -> AppResult<()> {
        // field names are interpolated into SQL, so only registry names pass
        if self.registry.is_indexed(T::TABLE, field) {
            Ok(())
        } else {
            Err(AppError::NotIndexed {
                table: T::TABLE.to_string(),
                field: field.to_string(),
            })
        }
    }

    fn collect<P: rusqlite::Params>(&self, sql: &str, params: P) -> AppResult<Vec<T>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let rows = stmt.query_map(params, |row| T::from_row(row))?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Store;
    use crate::models::{Norm, Welder};

    #[test]
    fn crud_on_a_table_handle() {
        let store = Store::open_in_memory().unwrap();
        let welders = store.welders();
        assert_eq!(welders.name(), "welders");

        let id = welders.add(&Welder::new("Kuznetsov")).unwrap();
        let mut w = welders.get(id).unwrap().unwrap();
        assert_eq!(w.name, "Kuznetsov");

        w.name = "Kuznetsov A.".into();
        assert!(welders.update(&w).unwrap());
        assert_eq!(welders.first_where("name", "Kuznetsov A.").unwrap(), Some(w));

        assert!(welders.delete(id).unwrap());
        assert!(!welders.delete(id).unwrap());
        assert!(welders.get(id).unwrap().is_none());
    }

    #[test]
    fn bulk_add_then_clear() {
        let store = Store::open_in_memory().unwrap();
        let norms = store.norms();
        norms.clear().unwrap();

        let ids = norms
            .bulk_add(&[Norm::new("A-1", 1.0), Norm::new("A-2", 2.0)])
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(norms.count().unwrap(), 2);
        assert_eq!(norms.where_eq("time", 2.0).unwrap()[0].article, "A-2");

        assert_eq!(norms.clear().unwrap(), 2);
        assert!(norms.all().unwrap().is_empty());
    }

    #[test]
    fn update_without_id_is_a_noop() {
        let store = Store::open_in_memory().unwrap();
        assert!(!store.welders().update(&Welder::new("Nobody")).unwrap());
    }
}
