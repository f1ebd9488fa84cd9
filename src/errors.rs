//! Unified application error type.
//! All modules (db, core, cli, config) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error(
        "Incompatible data version: database is at schema version {found}, this build supports up to {supported}"
    )]
    IncompatibleVersion { found: u32, supported: u32 },

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Schema declaration error: {0}")]
    Schema(String),

    #[error("Field '{field}' is not indexed on table '{table}'")]
    NotIndexed { table: String, field: String },

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid hours value: {0}")]
    InvalidHours(String),

    // ---------------------------
    // Lookup errors
    // ---------------------------
    #[error("Welder #{0} not found")]
    WelderNotFound(i64),

    #[error("Record #{0} not found")]
    RecordNotFound(i64),

    #[error("Plan #{0} not found")]
    PlanNotFound(i64),

    #[error("No norm found for article {0}")]
    NormNotFound(String),

    // ---------------------------
    // Logic errors
    // ---------------------------
    #[error("Plan #{id}: completed count cannot decrease ({current} → {requested})")]
    PlanRegression { id: i64, current: i64, requested: i64 },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
