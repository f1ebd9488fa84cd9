use crate::db::Store;
use crate::db::log::{LogRow, load_log};
use crate::errors::AppResult;
use crate::utils::formatting::strip_ansi;
use ansi_term::Colour;

const OP_WIDTH_MAX: usize = 60;

/// Colour of the operation column.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" => Colour::Green,
        "del" => Colour::Red,
        "edit" | "progress" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "seed" => Colour::Cyan,
        "backup" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

/// `operation (target)` truncated to `max` visible chars, operation coloured.
fn format_op_target(row: &LogRow, max: usize) -> String {
    let plain = if row.target.is_empty() {
        row.operation.clone()
    } else {
        format!("{} ({})", row.operation, row.target)
    };

    let visible = if plain.chars().count() > max {
        let mut s: String = plain.chars().take(max.saturating_sub(3)).collect();
        s.push_str("...");
        s
    } else {
        plain
    };

    let color = color_for_operation(&row.operation);
    match visible.split_once(' ') {
        Some((op, rest)) => format!("{} {}", color.paint(op), rest),
        None => color.paint(visible.as_str()).to_string(),
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn render(rows: &[LogRow]) -> Vec<String> {
        let op_w = rows
            .iter()
            .map(|r| strip_ansi(&format_op_target(r, OP_WIDTH_MAX)).chars().count())
            .max()
            .unwrap_or(10);
        let id_w = rows
            .iter()
            .map(|r| r.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = rows.iter().map(|r| r.date.len()).max().unwrap_or(10);

        rows.iter()
            .map(|r| {
                let date = chrono::DateTime::parse_from_rfc3339(&r.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or_else(|_| r.date.clone());
                let op = format_op_target(r, OP_WIDTH_MAX);
                let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&op).chars().count()));

                format!(
                    "{:>id_w$}: {:<date_w$} | {}{} => {}",
                    r.id,
                    date,
                    op,
                    padding,
                    r.message,
                    id_w = id_w,
                    date_w = date_w
                )
            })
            .collect()
    }

    pub fn print_log(store: &Store) -> AppResult<()> {
        let rows = load_log(store.conn())?;

        println!("📜 Internal log:\n");
        for line in Self::render(&rows) {
            println!("{}", line);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, op: &str, target: &str) -> LogRow {
        LogRow {
            id,
            date: "2024-01-10T08:00:00+03:00".to_string(),
            operation: op.to_string(),
            target: target.to_string(),
            message: "msg".to_string(),
        }
    }

    #[test]
    fn renders_migration_rows() {
        let store = Store::open_in_memory().unwrap();
        let rows = load_log(store.conn()).unwrap();
        let lines = LogLogic::render(&rows);

        // 4 migration steps + seed
        assert_eq!(lines.len(), 5);
        assert!(strip_ansi(&lines[0]).contains("migration_applied (v1)"));
        assert!(strip_ansi(&lines[4]).contains("seed (norms)"));
    }

    #[test]
    fn long_targets_are_truncated() {
        let long = "x".repeat(200);
        let out = strip_ansi(&format_op_target(&row(1, "backup", &long), 20));
        assert_eq!(out.chars().count(), 20);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn empty_log_renders_nothing() {
        assert!(LogLogic::render(&[]).is_empty());
        let lines = LogLogic::render(&[row(7, "add", "welders")]);
        assert!(strip_ansi(&lines[0]).starts_with("7: 2024-01-10T08:00:00+03:00 | add (welders)"));
    }
}
