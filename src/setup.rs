//! First-run filesystem setup.
//!
//! Creates the directory holding the SQLite database before the pool opens
//! it, so a fresh `~/.daybook` appears on first launch.

#[cfg(unix)]
use crate::constants::DEFAULT_DIR_PERMISSIONS;
use crate::errors::{AppError, AppResult};
use std::fs;
#[cfg(unix)]
use std::fs::Permissions;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
#[cfg(unix)]
use tracing::debug;

/// Creates the database's parent directory when it is missing.
///
/// New directories are owner-only (0o700) on unix.
///
/// # Errors
///
/// Returns:
/// - `AppError::Config` if the database path has no parent or the parent is
///   not absolute
/// - `AppError::Io` if directory creation or permission setting fails
pub fn ensure_data_directory_exists(db_path: &Path) -> AppResult<()> {
    let data_dir = match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => {
            return Err(AppError::Config(format!(
                "Database path has no parent directory: {}",
                db_path.display()
            )))
        }
    };

    if !data_dir.is_absolute() {
        return Err(AppError::Config(format!(
            "Database directory path must be absolute: {}",
            data_dir.display()
        )));
    }

    if !data_dir.exists() {
        fs::create_dir_all(data_dir).map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create data directory: {}", e),
            ))
        })?;

        // Set secure permissions (0o700 - read/write/execute only for owner)
        #[cfg(unix)]
        {
            let permissions = Permissions::from_mode(DEFAULT_DIR_PERMISSIONS);
            fs::set_permissions(data_dir, permissions).map_err(|e| {
                AppError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to set permissions on data directory: {}", e),
                ))
            })?;
            debug!("Set 0o700 permissions on data directory");
        }
    }

    Ok(())
}
