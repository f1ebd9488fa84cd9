pub mod daily;
pub mod history;
pub mod norm;
pub mod plan;
pub mod record;
pub mod welder;

pub use daily::DailyAllocation;
pub use norm::Norm;
pub use plan::Plan;
pub use record::Record;
pub use welder::Welder;

use crate::errors::AppError;
use chrono::{DateTime, Local, NaiveDate};

/// Parse an RFC 3339 column into local time. `table`/`id` locate the row in
/// the error.
pub(crate) fn parse_timestamp(
    raw: &str,
    table: &str,
    id: i64,
) -> rusqlite::Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|_| bad_date(raw, table, id))
}

/// Parse a `YYYY-MM-DD` day key column.
pub(crate) fn parse_day(raw: &str, table: &str, id: i64) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| bad_date(raw, table, id))
}

fn bad_date(raw: &str, table: &str, id: i64) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(AppError::InvalidDate(format!("'{}' in {} #{}", raw, table, id))),
    )
}
