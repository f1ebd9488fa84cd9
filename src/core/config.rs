use crate::config::Config;
use crate::config::migrate::{migrate_config_file, missing_keys};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    pub fn print(cfg: &Config) -> AppResult<()> {
        println!("📄 Current configuration:\n");
        println!("{}", cfg.to_yaml()?);
        Ok(())
    }

    /// Report keys missing from the configuration file.
    pub fn check() -> AppResult<Vec<String>> {
        let path = Config::config_file();
        if !path.exists() {
            warning(format!(
                "No configuration file at {} (defaults in use). Run `weldlog init`.",
                path.display()
            ));
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
        let missing = missing_keys(&content)?;

        if missing.is_empty() {
            success("Configuration file is complete.");
        } else {
            warning(format!("Missing keys: {}", missing.join(", ")));
            info("Run `weldlog config --migrate` to add them with default values.");
        }
        Ok(missing)
    }

    pub fn migrate() -> AppResult<()> {
        let path = Config::config_file();
        if !path.exists() {
            warning("No configuration file to migrate.");
            return Ok(());
        }

        let added = migrate_config_file(&path)?;
        if added.is_empty() {
            info("Configuration already up to date.");
        } else {
            success(format!("Added keys: {}", added.join(", ")));
        }
        Ok(())
    }

    pub fn edit(editor: &Option<String>) -> AppResult<()> {
        let path = Config::config_file();
        let default_editor = std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            });
        let ed = editor.clone().unwrap_or_else(|| default_editor.clone());

        let status = Command::new(&ed)
            .arg(&path)
            .status()
            .map_err(|e| AppError::Config(format!("cannot start '{}': {}", ed, e)))?;

        if status.success() {
            success(format!("Configuration file edited using '{}'", ed));
            Ok(())
        } else {
            Err(AppError::Config(format!("editor '{}' exited with {}", ed, status)))
        }
    }
}
