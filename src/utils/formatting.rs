//! Formatting utilities used for CLI outputs.

use regex::Regex;
use std::sync::OnceLock;

/// Remove ANSI color sequences, e.g. to measure visible width.
pub fn strip_ansi(s: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("valid ANSI regex"));
    re.replace_all(s, "").into_owned()
}

pub fn separator(ch: &str, width: usize) -> String {
    let c = ch.chars().next().unwrap_or('-');
    std::iter::repeat_n(c, width).collect()
}

/// Hours as `8h`, `5.5h`, `0.25h`.
pub fn fmt_hours(hours: f64) -> String {
    let rounded = (hours * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}h", rounded as i64)
    } else {
        format!("{}h", rounded)
    }
}

/// Plan quantity as `3/10`, or `3/∞` when unlimited.
pub fn fmt_progress(completed: i64, quantity: i64, unlimited: bool) -> String {
    if unlimited {
        format!("{}/∞", completed)
    } else {
        format!("{}/{}", completed, quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours() {
        assert_eq!(fmt_hours(8.0), "8h");
        assert_eq!(fmt_hours(5.5), "5.5h");
        assert_eq!(fmt_hours(0.333), "0.33h");
    }

    #[test]
    fn progress() {
        assert_eq!(fmt_progress(3, 10, false), "3/10");
        assert_eq!(fmt_progress(3, 10, true), "3/∞");
        assert_eq!(separator("=", 3), "===");
        assert_eq!(separator("", 2), "--");
    }
}
