//! Table rendering utilities for CLI outputs.

use super::formatting::strip_ansi;

pub struct Column {
    pub header: String,
    pub width: usize,
}

impl Column {
    pub fn new(header: &str, width: usize) -> Self {
        Self {
            header: header.to_string(),
            width,
        }
    }
}

pub struct TextTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self, separator_char: &str) -> String {
        let mut out = String::new();

        // Header
        for col in &self.columns {
            out.push_str(&pad(&col.header, col.width));
        }
        out.push('\n');

        let total: usize = self.columns.iter().map(|c| c.width + 1).sum();
        out.push_str(&super::formatting::separator(separator_char, total));
        out.push('\n');

        // Rows
        for row in &self.rows {
            for (i, col) in self.columns.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                out.push_str(&pad(cell, col.width));
            }
            out.push('\n');
        }

        out
    }
}

/// Left-align `s` in `width` visible characters (ANSI escapes not counted).
fn pad(s: &str, width: usize) -> String {
    let visible = strip_ansi(s).chars().count();
    format!("{}{} ", s, " ".repeat(width.saturating_sub(visible)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_aligned_rows() {
        let mut t = TextTable::new(vec![Column::new("ID", 3), Column::new("Name", 6)]);
        t.add_row(vec!["1".into(), "Ivanov".into()]);
        t.add_row(vec!["12".into(), "\x1b[32mОля\x1b[0m".into()]);

        let out = t.render("-");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ID  Name   ");
        assert_eq!(lines[1], "-".repeat(11));
        assert_eq!(lines[2], "1   Ivanov ");
        assert_eq!(strip_ansi(lines[3]), "12  Оля    ");
    }
}
