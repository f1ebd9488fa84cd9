//! One-time reference data for the `norms` table.
//!
//! Policy: a non-empty `norms` table counts as initialized, whatever rows it
//! holds. Seeding only happens while the table is empty, so user-added norms
//! also suppress it. Two processes opening a fresh store at the same moment
//! can both see zero rows and both insert; duplicates are possible there.

use crate::db::log::ttlog;
use crate::db::schema::{NORMS, SchemaRegistry};
use crate::db::table::Table;
use crate::errors::AppResult;
use crate::models::Norm;
use crate::ui::messages::warning;
use rusqlite::Connection;

/// (article, hours per unit)
pub const SEED_NORMS: [(&str, f64); 5] = [
    ("ХТ637", 10.0),
    ("ХТ55", 12.0),
    ("ХТ52", 8.0),
    ("АРТ123", 5.5),
    ("АРТ456", 15.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Inserted(usize),
    AlreadyPresent(i64),
}

pub fn seed_norms() -> Vec<Norm> {
    SEED_NORMS
        .iter()
        .map(|(article, time)| Norm::new(article, *time))
        .collect()
}

/// Insert the seed norms iff the table is empty.
pub fn populate_norms(conn: &Connection, registry: &SchemaRegistry) -> AppResult<SeedOutcome> {
    let norms: Table<'_, Norm> = Table::new(conn, registry);

    let count = norms.count()?;
    if count > 0 {
        return Ok(SeedOutcome::AlreadyPresent(count));
    }

    let ids = norms.bulk_add(&seed_norms())?;

    // the rows are already committed
    if let Err(e) = ttlog(
        conn,
        "seed",
        NORMS,
        &format!("Inserted {} reference norms", ids.len()),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    Ok(SeedOutcome::Inserted(ids.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrate::{MigrationOptions, run_pending_migrations};

    fn migrated() -> (Connection, SchemaRegistry) {
        let conn = Connection::open_in_memory().unwrap();
        let reg = SchemaRegistry::latest().unwrap();
        run_pending_migrations(&conn, &reg, &MigrationOptions::quiet()).unwrap();
        (conn, reg)
    }

    #[test]
    fn seeds_empty_table_once() {
        let (conn, reg) = migrated();

        assert_eq!(populate_norms(&conn, &reg).unwrap(), SeedOutcome::Inserted(5));
        assert_eq!(
            populate_norms(&conn, &reg).unwrap(),
            SeedOutcome::AlreadyPresent(5)
        );

        let norms: Table<'_, Norm> = Table::new(&conn, &reg);
        assert_eq!(norms.count().unwrap(), 5);
    }

    #[test]
    fn log_failure_does_not_fail_the_seed() {
        let (conn, reg) = migrated();
        conn.execute_batch("DROP TABLE log").unwrap();

        assert_eq!(populate_norms(&conn, &reg).unwrap(), SeedOutcome::Inserted(5));
        let norms: Table<'_, Norm> = Table::new(&conn, &reg);
        assert_eq!(norms.count().unwrap(), 5);
    }

    #[test]
    fn any_existing_norm_suppresses_seeding() {
        let (conn, reg) = migrated();
        let norms: Table<'_, Norm> = Table::new(&conn, &reg);
        norms.add(&Norm::new("CUSTOM-1", 2.0)).unwrap();

        assert_eq!(
            populate_norms(&conn, &reg).unwrap(),
            SeedOutcome::AlreadyPresent(1)
        );
        assert!(norms.first_where("article", "ХТ637").unwrap().is_none());
    }

    #[test]
    fn seed_values_match_reference() {
        let (conn, reg) = migrated();
        populate_norms(&conn, &reg).unwrap();
        let norms: Table<'_, Norm> = Table::new(&conn, &reg);

        let art123 = norms.first_where("article", "АРТ123").unwrap().unwrap();
        assert_eq!(art123.time, 5.5);
        let all: Vec<(String, f64)> = norms
            .all()
            .unwrap()
            .into_iter()
            .map(|n| (n.article, n.time))
            .collect();
        let expected: Vec<(String, f64)> = SEED_NORMS
            .iter()
            .map(|(a, t)| (a.to_string(), *t))
            .collect();
        assert_eq!(all, expected);
    }
}
