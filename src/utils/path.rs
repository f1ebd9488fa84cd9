//! Path utilities: expand `~` in user-supplied database paths.

use std::path::PathBuf;

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// Normalize a `--db` argument into the string stored in `Config::database`.
pub fn resolve_db_path(raw: &str) -> String {
    expand_tilde(raw.trim()).to_string_lossy().to_string()
}
