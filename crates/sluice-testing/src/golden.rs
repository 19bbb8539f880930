//! Minimal golden-file harness.
//!
//! Used by `sluice-http`'s integration tests to pin the SSE wire format
//! emitted on abort (`event: aborted`, the JSON payload shape, the blank
//! line framing) against a checked-in snapshot, the way the teacher's
//! golden-test crate pinned tool outputs.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GoldenError {
    #[error("golden file {0:?} does not exist yet; set UPDATE_GOLDEN=1 to create it")]
    Missing(PathBuf),

    #[error("golden file {path:?} mismatch:\n--- expected ---\n{expected}\n--- actual ---\n{actual}")]
    Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("io error reading/writing {0:?}: {1}")]
    Io(PathBuf, std::io::Error),
}

/// Compare `actual` against the contents of the golden file at `path`.
///
/// If the `UPDATE_GOLDEN` environment variable is set, the golden file is
/// (re)written with `actual` instead of compared, mirroring the teacher's
/// snapshot-manager auto-update mode.
pub fn assert_golden(path: impl AsRef<Path>, actual: &str) -> Result<(), GoldenError> {
    let path = path.as_ref();

    if std::env::var_os("UPDATE_GOLDEN").is_some() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| GoldenError::Io(path.to_path_buf(), e))?;
        }
        fs::write(path, actual).map_err(|e| GoldenError::Io(path.to_path_buf(), e))?;
        return Ok(());
    }

    if !path.exists() {
        return Err(GoldenError::Missing(path.to_path_buf()));
    }

    let expected =
        fs::read_to_string(path).map_err(|e| GoldenError::Io(path.to_path_buf(), e))?;

    if expected == actual {
        Ok(())
    } else {
        Err(GoldenError::Mismatch {
            path: path.to_path_buf(),
            expected,
            actual: actual.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_content_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.txt");
        fs::write(&path, "hello\n").unwrap();
        assert!(assert_golden(&path, "hello\n").is_ok());
    }

    #[test]
    fn mismatched_content_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.txt");
        fs::write(&path, "hello\n").unwrap();
        let err = assert_golden(&path, "goodbye\n").unwrap_err();
        assert!(matches!(err, GoldenError::Mismatch { .. }));
    }

    #[test]
    fn missing_file_without_update_flag_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does_not_exist.txt");
        let err = assert_golden(&path, "content").unwrap_err();
        assert!(matches!(err, GoldenError::Missing(_)));
    }
}
