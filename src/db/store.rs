//! Store facade: the one handle the rest of the application reads and writes
//! through.
//!
//! A `Store` owns the SQLite connection. Opening one runs pending migrations
//! and the norms seed, so every holder sees a migrated, seeded database.
//! It is built once by the composition root (the CLI dispatcher) and passed
//! down; there is no process-wide instance.

use crate::config::Config;
use crate::db::migrate::{MigrationOptions, MigrationReport, run_pending_migrations, schema_version};
use crate::db::schema::{NORMS, SchemaRegistry};
use crate::db::seed::{SeedOutcome, populate_norms};
use crate::db::table::Table;
use crate::errors::AppResult;
use crate::models::{DailyAllocation, Norm, Plan, Record, Welder};
use crate::ui::messages::warning;
use rusqlite::Connection;
use std::path::Path;

pub struct Store {
    conn: Connection,
    registry: SchemaRegistry,
    migration: MigrationReport,
    seed: Option<SeedOutcome>,
}

impl Store {
    /// Open (or create) the store at `path` using the built-in schema.
    pub fn open<P: AsRef<Path>>(path: P, cfg: &Config) -> AppResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        let opts = MigrationOptions {
            backup: cfg.backup_before_migration,
            verbose: true,
        };
        Self::open_with(conn, SchemaRegistry::latest()?, &opts)
    }

    /// In-memory store, quiet and without backups.
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::open_with(conn, SchemaRegistry::latest()?, &MigrationOptions::quiet())
    }

    /// Migrate and seed an already opened connection.
    ///
    /// Version and migration errors fail the open. A failed seed does not:
    /// it is reported and retried on the next open, since the table is
    /// still empty.
    pub fn open_with(
        conn: Connection,
        registry: SchemaRegistry,
        opts: &MigrationOptions,
    ) -> AppResult<Self> {
        let migration = run_pending_migrations(&conn, &registry, opts)?;

        let seed = if registry.table(NORMS).is_some() {
            match populate_norms(&conn, &registry) {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    warning(format!("Seeding norms failed, will retry on next open: {}", e));
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            conn,
            registry,
            migration,
            seed,
        })
    }

    pub fn welders(&self) -> Table<'_, Welder> {
        Table::new(&self.conn, &self.registry)
    }

    pub fn plans(&self) -> Table<'_, Plan> {
        Table::new(&self.conn, &self.registry)
    }

    pub fn records(&self) -> Table<'_, Record> {
        Table::new(&self.conn, &self.registry)
    }

    pub fn norms(&self) -> Table<'_, Norm> {
        Table::new(&self.conn, &self.registry)
    }

    pub fn dailies(&self) -> Table<'_, DailyAllocation> {
        Table::new(&self.conn, &self.registry)
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn schema_version(&self) -> AppResult<u32> {
        schema_version(&self.conn)
    }

    /// What the open did to the schema.
    pub fn migration(&self) -> &MigrationReport {
        &self.migration
    }

    /// What the open did to the norms table; `None` if seeding failed.
    pub fn seed(&self) -> Option<SeedOutcome> {
        self.seed
    }

    /// Run an internal log write without failing the caller.
    pub fn log(&self, operation: &str, target: &str, message: &str) {
        if let Err(e) = crate::db::log::ttlog(&self.conn, operation, target, message) {
            warning(format!("Failed to write internal log: {}", e));
        }
    }
}
