use chrono::{Datelike, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// `YYYY-MM-DD`, or the keyword `today`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.eq_ignore_ascii_case("today") {
        return Some(today());
    }
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Inclusive first/last day of a period: `YYYY-MM-DD`, `YYYY-MM` or `YYYY`,
/// or a `start:end` range of those.
pub fn period_bounds(p: &str) -> Result<(NaiveDate, NaiveDate), String> {
    if let Some((start, end)) = p.split_once(':') {
        let (s, _) = single_period(start)?;
        let (_, e) = single_period(end)?;
        if s > e {
            return Err(format!("Invalid period: {} is after {}", s, e));
        }
        return Ok((s, e));
    }
    single_period(p)
}

fn single_period(p: &str) -> Result<(NaiveDate, NaiveDate), String> {
    let p = p.trim();

    // YYYY-MM-DD
    if let Some(d) = parse_date(p) {
        return Ok((d, d));
    }

    // YYYY-MM
    if let Ok(first) = NaiveDate::parse_from_str(&format!("{}-01", p), "%Y-%m-%d") {
        return Ok((first, last_day_of_month(first.year(), first.month())));
    }

    // YYYY
    if p.len() == 4
        && let Ok(year) = p.parse::<i32>()
        && let (Some(first), Some(last)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        )
    {
        return Ok((first, last));
    }

    Err(format!("Invalid period: {}", p))
}

fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_days() {
        assert_eq!(parse_date("2024-01-10"), Some(d(2024, 1, 10)));
        assert_eq!(parse_date("10.01.2024"), None);
        assert!(parse_date("today").is_some());
    }

    #[test]
    fn period_forms() {
        assert_eq!(period_bounds("2024-02").unwrap(), (d(2024, 2, 1), d(2024, 2, 29)));
        assert_eq!(period_bounds("2023").unwrap(), (d(2023, 1, 1), d(2023, 12, 31)));
        assert_eq!(
            period_bounds("2024-01-10:2024-03").unwrap(),
            (d(2024, 1, 10), d(2024, 3, 31))
        );
        assert!(period_bounds("2024-05:2024-01").is_err());
        assert!(period_bounds("soon").is_err());
    }
}
