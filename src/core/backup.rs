use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{confirm, info, success, warning};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the configured database to `dest_file`, optionally as a .zip.
    /// Returns the final path, or `None` when the user declined to overwrite.
    pub fn backup(cfg: &Config, dest_file: &str, compress: bool) -> AppResult<Option<PathBuf>> {
        let src = Path::new(&cfg.database);
        let dest = Path::new(dest_file);

        // 1️⃣ Check DB exists
        if !src.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Database not found: {}", src.display()),
            )
            .into());
        }

        // 2️⃣ Ensure destination folder exists
        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let final_target = if compress {
            dest.with_extension("zip")
        } else {
            dest.to_path_buf()
        };

        // 3️⃣ Never overwrite silently
        if final_target.exists()
            && !confirm(&format!(
                "The file '{}' already exists. Overwrite it?",
                final_target.display()
            ))
        {
            info("Backup cancelled.");
            return Ok(None);
        }

        // 4️⃣ Copy or compress
        if compress {
            let entry = src
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "weldlog.sqlite".to_string());
            zip_file(src, &final_target, &entry)?;
            success(format!("📦 Compressed backup created: {}", final_target.display()));
        } else {
            fs::copy(src, &final_target)?;
            success(format!("Backup created: {}", final_target.display()));
        }

        // 5️⃣ Log in DB (non-blocking)
        match Connection::open(src) {
            Ok(conn) => {
                if crate::db::log::ttlog(
                    &conn,
                    "backup",
                    &final_target.to_string_lossy(),
                    if compress {
                        "Backup created and compressed"
                    } else {
                        "Backup created"
                    },
                )
                .is_err()
                {
                    warning("Backup written, but the internal log could not be updated.");
                }
            }
            Err(e) => warning(format!("Failed to reopen database for logging: {}", e)),
        }

        Ok(Some(final_target))
    }
}

/// Write `src` into a new deflated zip archive at `zip_path` under `entry_name`.
pub fn zip_file(src: &Path, zip_path: &Path, entry_name: &str) -> AppResult<()> {
    let file = fs::File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut f = fs::File::open(src)?;
    zip.start_file(entry_name, options)
        .map_err(std::io::Error::other)?;

    std::io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(std::io::Error::other)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn zips_a_file() {
        let src = env::temp_dir().join("weldlog_zip_src.bin");
        let dst = env::temp_dir().join("weldlog_zip_src.zip");
        fs::write(&src, b"welders").unwrap();
        fs::remove_file(&dst).ok();

        zip_file(&src, &dst, "data.bin").unwrap();

        let mut archive = zip::ZipArchive::new(fs::File::open(&dst).unwrap()).unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.by_index(0).unwrap().name(), "data.bin");

        fs::remove_file(&src).ok();
        fs::remove_file(&dst).ok();
    }
}
