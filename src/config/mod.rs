use crate::errors::{AppError, AppResult};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

pub mod migrate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_backup_before_migration")]
    pub backup_before_migration: bool,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_separator_char")]
    pub separator_char: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_backup_before_migration() -> bool {
    true
}
fn default_date_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}
fn default_separator_char() -> String {
    "-".to_string()
}

/// Reject strftime patterns chrono cannot render; formatting them would panic.
pub fn check_date_format(fmt: &str) -> AppResult<()> {
    if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
        return Err(AppError::Config(format!("invalid date_format '{}'", fmt)));
    }
    Ok(())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            backup_before_migration: default_backup_before_migration(),
            date_format: default_date_format(),
            separator_char: default_separator_char(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("weldlog")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".weldlog")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("weldlog.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("weldlog.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    /// Keys missing from the file take their default values.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
            Self::from_yaml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Self =
            serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))?;
        check_date_format(&cfg.date_format)?;
        Ok(cfg)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)
    }

    pub fn save(&self) -> AppResult<()> {
        fs::create_dir_all(Self::config_dir())?;
        let yaml = self.to_yaml()?;
        let mut file = fs::File::create(Self::config_file())?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Initialize configuration and database location.
    /// Returns the configuration that was written (or would have been, in test mode).
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> io::Result<Config> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            fs::create_dir_all(&dir)?;
            let yaml = serde_yaml::to_string(&config).map_err(io::Error::other)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let cfg = Config::from_yaml("database: /tmp/w.sqlite\n").unwrap();
        assert_eq!(cfg.database, "/tmp/w.sqlite");
        assert!(cfg.backup_before_migration);
        assert_eq!(cfg.separator_char, "-");
    }

    #[test]
    fn empty_file_is_default() {
        let cfg = Config::from_yaml("   \n").unwrap();
        assert_eq!(cfg.date_format, "%Y-%m-%d %H:%M");
    }

    #[test]
    fn unrenderable_date_format_is_config_error() {
        let err = Config::from_yaml("date_format: \"%Q\"\n").unwrap_err();
        assert!(matches!(err, AppError::Config(ref m) if m.contains("%Q")));
        assert!(Config::from_yaml("date_format: \"%d.%m.%Y\"\n").is_ok());
        assert!(check_date_format(&Config::default().date_format).is_ok());
    }

    #[test]
    fn bad_yaml_is_config_error() {
        let err = Config::from_yaml("backup_before_migration: [nope").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
