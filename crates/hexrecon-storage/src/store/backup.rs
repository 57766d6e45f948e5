//! Backup rotation: the previous table moves to `<path>~<unix-epoch-seconds>~`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use hexrecon_core::StoreError;

/// Backup location for `path` at `epoch_secs`.
pub fn backup_path(path: &Path, epoch_secs: i64) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!("~{epoch_secs}~"));
    PathBuf::from(name)
}

/// Move the current table aside. Returns the backup path, or `None` when
/// there was no file to move.
pub(crate) fn rotate(path: &Path) -> Result<Option<PathBuf>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let target = backup_path(path, chrono::Utc::now().timestamp());
    std::fs::rename(path, &target).map_err(|e| StoreError::io(path, e))?;
    Ok(Some(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_name_appends_epoch() {
        assert_eq!(
            backup_path(Path::new("labels/db.csv"), 1_700_000_000),
            PathBuf::from("labels/db.csv~1700000000~")
        );
    }
}
