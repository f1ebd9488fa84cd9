//! Configuration file upgrades: detect keys missing from an older file and
//! write them back with their default values.

use super::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Keys a complete configuration file carries.
fn known_keys() -> AppResult<Vec<String>> {
    let yaml = serde_yaml::to_value(Config::default()).map_err(|e| AppError::Config(e.to_string()))?;
    Ok(yaml
        .as_mapping()
        .map(|m| {
            m.keys()
                .filter_map(|k| k.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default())
}

/// Return the keys absent from `content`, in declaration order.
pub fn missing_keys(content: &str) -> AppResult<Vec<String>> {
    let value: Value = if content.trim().is_empty() {
        Value::Mapping(Default::default())
    } else {
        serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))?
    };

    let present = value.as_mapping().cloned().unwrap_or_default();

    Ok(known_keys()?
        .into_iter()
        .filter(|k| !present.contains_key(Value::String(k.clone())))
        .collect())
}

/// Rewrite the file at `path` with missing keys filled in.
/// Returns the keys that were added; no write happens when nothing is missing.
pub fn migrate_config_file(path: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    let missing = missing_keys(&content)?;

    if missing.is_empty() {
        return Ok(missing);
    }

    let cfg = Config::from_yaml(&content)?;
    fs::write(path, cfg.to_yaml()?).map_err(|_| AppError::ConfigSave)?;

    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn detects_missing_keys() {
        let missing = missing_keys("database: /tmp/x.sqlite\nseparator_char: '='\n").unwrap();
        assert_eq!(missing, vec!["backup_before_migration", "date_format"]);
    }

    #[test]
    fn complete_file_has_nothing_missing() {
        let yaml = Config::default().to_yaml().unwrap();
        assert!(missing_keys(&yaml).unwrap().is_empty());
    }

    #[test]
    fn migrate_fills_file() {
        let path = env::temp_dir().join("weldlog_cfg_migrate_test.conf");
        fs::write(&path, "database: /tmp/keep.sqlite\n").unwrap();

        let added = migrate_config_file(&path).unwrap();
        assert_eq!(added.len(), 3);

        let cfg = Config::from_yaml(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(cfg.database, "/tmp/keep.sqlite");
        assert!(migrate_config_file(&path).unwrap().is_empty());

        fs::remove_file(&path).ok();
    }
}
