//! Migration runner.
//!
//! The schema version of a store lives in `PRAGMA user_version` (0 = never
//! initialized). Upgrades are computed from the schema registry and applied
//! in one transaction: either the store ends at the latest version with all
//! rows intact, or nothing changes.

use crate::core::backup::zip_file;
use crate::db::log::{ensure_log_table, ttlog};
use crate::db::schema::{MigrationStep, SchemaRegistry, index_name};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use chrono::Local;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct MigrationOptions {
    /// Zip the database file before upgrading an existing store.
    pub backup: bool,
    /// Print progress messages.
    pub verbose: bool,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            backup: true,
            verbose: true,
        }
    }
}

impl MigrationOptions {
    pub fn quiet() -> Self {
        Self {
            backup: false,
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub from: u32,
    pub to: u32,
    pub applied: Vec<u32>,
    pub backup: Option<PathBuf>,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Read the recorded schema version.
pub fn schema_version(conn: &Connection) -> AppResult<u32> {
    let v: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    u32::try_from(v).map_err(|_| AppError::Migration(format!("invalid user_version {}", v)))
}

/// Check if `table` has a column named `column`.
fn column_exists(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn apply_step(conn: &Connection, step: &MigrationStep) -> rusqlite::Result<()> {
    for table in &step.new_tables {
        conn.execute_batch(&table.create_sql())?;
    }

    for (table, col) in &step.new_columns {
        // tolerate columns added by hand
        if column_exists(conn, table, &col.name)? {
            continue;
        }
        conn.execute_batch(&format!(
            "ALTER TABLE {} ADD COLUMN {}",
            table,
            col.to_sql()
        ))?;
    }

    for (table, field) in &step.new_indexes {
        conn.execute_batch(&format!(
            "CREATE INDEX IF NOT EXISTS {} ON {}({})",
            index_name(table, field),
            table,
            field
        ))?;
    }

    Ok(())
}

fn backup_before_migration(db_path: &Path, target: u32) -> AppResult<PathBuf> {
    let stem = db_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "database".to_string());

    let backup_name = format!(
        "{}-backup_pre_v{}-{}.zip",
        stem,
        target,
        Local::now().format("%Y%m%d_%H%M%S")
    );

    let backup_path = db_path
        .parent()
        .map(|p| p.join(&backup_name))
        .unwrap_or_else(|| PathBuf::from(&backup_name));

    zip_file(db_path, &backup_path, "database.sqlite")?;
    Ok(backup_path)
}

/// Public entry point: bring the store up to `registry.latest_version()`.
///
/// Invoked by `Store::open` and by `db --migrate`.
pub fn run_pending_migrations(
    conn: &Connection,
    registry: &SchemaRegistry,
    opts: &MigrationOptions,
) -> AppResult<MigrationReport> {
    let from = schema_version(conn)?;
    let latest = registry.latest_version();

    // 1) Refuse stores written by a newer build, before touching anything
    if from > latest {
        return Err(AppError::IncompatibleVersion {
            found: from,
            supported: latest,
        });
    }

    let steps = registry.steps_from(from);

    // 2) Safety copy of an existing on-disk store
    let mut backup = None;
    if from >= 1 && !steps.is_empty() && opts.backup {
        match conn.path().filter(|p| !p.is_empty()) {
            Some(path) => {
                if opts.verbose {
                    warning(format!(
                        "Schema v{} detected, creating safety backup before upgrading to v{}...",
                        from, latest
                    ));
                }
                let p = backup_before_migration(Path::new(path), latest)
                    .map_err(|e| AppError::Migration(format!("pre-migration backup failed: {}", e)))?;
                if opts.verbose {
                    success(format!("📦 Backup created: {}", p.display()));
                }
                backup = Some(p);
            }
            None => {
                if opts.verbose {
                    warning("Could not determine DB path, backup skipped.");
                }
            }
        }
    }

    // 3) All steps + version bump in one transaction
    let tx = conn.unchecked_transaction()?;

    ensure_log_table(&tx).map_err(|e| AppError::Migration(format!("log table: {}", e)))?;

    let mut applied = Vec::with_capacity(steps.len());
    for step in &steps {
        apply_step(&tx, step)
            .map_err(|e| AppError::Migration(format!("v{}: {}", step.version, e)))?;

        ttlog(
            &tx,
            "migration_applied",
            &format!("v{}", step.version),
            &step.describe(),
        )?;

        applied.push(step.version);
    }

    if from != latest {
        tx.execute_batch(&format!("PRAGMA user_version = {}", latest))
            .map_err(|e| AppError::Migration(format!("version bump: {}", e)))?;
    }

    tx.commit()
        .map_err(|e| AppError::Migration(format!("commit: {}", e)))?;

    if opts.verbose && !applied.is_empty() {
        success(format!("Schema upgraded: v{} → v{}", from, latest));
    }

    Ok(MigrationReport {
        from,
        to: latest,
        applied,
        backup,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::{ColumnDecl, ColumnType, SchemaVersion};

    fn registry_up_to(max: u32) -> SchemaRegistry {
        let all = SchemaRegistry::latest().unwrap();
        let decls: Vec<SchemaVersion> = all
            .versions()
            .filter(|v| *v <= max)
            .map(|v| {
                let schema = all.version(v).unwrap();
                let mut decl = SchemaVersion::new(v);
                for t in schema.tables.values() {
                    let spec = std::iter::once(format!("++{}", t.index.primary))
                        .chain(t.index.fields.iter().cloned())
                        .collect::<Vec<_>>()
                        .join(", ");
                    decl = decl.table(&t.name, &spec, t.columns.clone());
                }
                decl
            })
            .collect();
        SchemaRegistry::new(decls).unwrap()
    }

    #[test]
    fn fresh_store_goes_to_latest() {
        let conn = Connection::open_in_memory().unwrap();
        let reg = SchemaRegistry::latest().unwrap();

        let report = run_pending_migrations(&conn, &reg, &MigrationOptions::quiet()).unwrap();
        assert_eq!(report.from, 0);
        assert_eq!(report.to, 4);
        assert_eq!(report.applied, vec![1, 2, 3, 4]);
        assert_eq!(schema_version(&conn).unwrap(), 4);
        assert!(column_exists(&conn, "dailies", "record_id").unwrap());

        let logged: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(logged, 4);
    }

    #[test]
    fn second_run_is_noop() {
        let conn = Connection::open_in_memory().unwrap();
        let reg = SchemaRegistry::latest().unwrap();
        run_pending_migrations(&conn, &reg, &MigrationOptions::quiet()).unwrap();

        let again = run_pending_migrations(&conn, &reg, &MigrationOptions::quiet()).unwrap();
        assert!(again.is_noop());
        assert_eq!(again.from, 4);
    }

    #[test]
    fn every_version_pair_upgrades_without_data_loss() {
        for v1 in 1..=4u32 {
            for v2 in (v1 + 1)..=4u32 {
                let conn = Connection::open_in_memory().unwrap();
                run_pending_migrations(&conn, &registry_up_to(v1), &MigrationOptions::quiet())
                    .unwrap();

                conn.execute("INSERT INTO welders (name) VALUES ('Petrov')", [])
                    .unwrap();
                conn.execute(
                    "INSERT INTO records (welder_id, article, quantity, date, history)
                     VALUES (1, 'ХТ55', 4, '2024-01-10T08:00:00+00:00', 'legacy')",
                    [],
                )
                .unwrap();

                let report =
                    run_pending_migrations(&conn, &registry_up_to(v2), &MigrationOptions::quiet())
                        .unwrap();
                assert_eq!(report.from, v1);
                assert_eq!(report.to, v2);

                let (name,): (String,) = conn
                    .query_row("SELECT name FROM welders WHERE id = 1", [], |r| {
                        Ok((r.get(0)?,))
                    })
                    .unwrap();
                assert_eq!(name, "Petrov");

                let (qty, history): (i64, String) = conn
                    .query_row("SELECT quantity, history FROM records WHERE id = 1", [], |r| {
                        Ok((r.get(0)?, r.get(1)?))
                    })
                    .unwrap();
                assert_eq!(qty, 4);
                assert_eq!(history, "legacy");

                if v1 < 3 && v2 >= 3 {
                    let (last, hours): (Option<String>, f64) = conn
                        .query_row(
                            "SELECT last_updated, total_hours FROM records WHERE id = 1",
                            [],
                            |r| Ok((r.get(0)?, r.get(1)?)),
                        )
                        .unwrap();
                    assert!(last.is_none());
                    assert_eq!(hours, 0.0);
                }
            }
        }
    }

    #[test]
    fn newer_store_is_rejected_untouched() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA user_version = 9;").unwrap();
        let reg = SchemaRegistry::latest().unwrap();

        let err = run_pending_migrations(&conn, &reg, &MigrationOptions::quiet()).unwrap_err();
        assert!(matches!(
            err,
            AppError::IncompatibleVersion {
                found: 9,
                supported: 4
            }
        ));

        let tables: i64 = conn
            .query_row("SELECT COUNT(*) FROM sqlite_master WHERE type='table'", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(tables, 0);
        assert_eq!(schema_version(&conn).unwrap(), 9);
    }

    #[test]
    fn failed_step_rolls_back_everything() {
        let conn = Connection::open_in_memory().unwrap();
        // a view squatting on a table name cannot be indexed
        conn.execute_batch("CREATE VIEW dailies AS SELECT 1 AS x;").unwrap();

        let reg = SchemaRegistry::latest().unwrap();
        let err = run_pending_migrations(&conn, &reg, &MigrationOptions::quiet()).unwrap_err();
        assert!(matches!(err, AppError::Migration(_)));

        assert_eq!(schema_version(&conn).unwrap(), 0);
        let welders: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='welders'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(welders, 0);
    }

    #[test]
    fn custom_registry_adds_column_with_default() {
        let conn = Connection::open_in_memory().unwrap();
        let v1 = SchemaRegistry::new(vec![SchemaVersion::new(1).table(
            "tools",
            "++id, code",
            vec![ColumnDecl::required("code", ColumnType::Text)],
        )])
        .unwrap();
        run_pending_migrations(&conn, &v1, &MigrationOptions::quiet()).unwrap();
        conn.execute("INSERT INTO tools (code) VALUES ('MIG-200')", [])
            .unwrap();

        let v2 = SchemaRegistry::new(vec![
            SchemaVersion::new(1).table(
                "tools",
                "++id, code",
                vec![ColumnDecl::required("code", ColumnType::Text)],
            ),
            SchemaVersion::new(2).table(
                "tools",
                "++id, code, amps",
                vec![
                    ColumnDecl::required("code", ColumnType::Text),
                    ColumnDecl::with_default("amps", ColumnType::Integer, "160"),
                ],
            ),
        ])
        .unwrap();
        run_pending_migrations(&conn, &v2, &MigrationOptions::quiet()).unwrap();

        let amps: i64 = conn
            .query_row("SELECT amps FROM tools WHERE code = 'MIG-200'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(amps, 160);
    }
}
