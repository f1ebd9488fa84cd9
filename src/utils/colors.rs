/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Plan progress color:
/// done → green
/// started → yellow
/// untouched → grey
pub fn color_for_progress(completed: i64, quantity: i64, unlimited: bool) -> &'static str {
    if !unlimited && completed >= quantity {
        GREEN
    } else if completed > 0 {
        YELLOW
    } else {
        GREY
    }
}

/// Grey for missing values (None or empty), reset otherwise.
pub fn colorize_optional(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => format!("{GREY}--{RESET}"),
    }
}

/// Red when a day's hours exceed `limit`.
pub fn colorize_hours(hours: f64, limit: f64) -> String {
    let text = format!("{:.1}", hours);
    if hours > limit {
        format!("{RED}{text}{RESET}")
    } else {
        text
    }
}
