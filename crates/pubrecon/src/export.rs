//! JSON export for the command line.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{ApiError, ApiResult};

/// Write `value` as pretty JSON to `dir/file_name` and return the path.
///
/// # Errors
///
/// Fails when `dir` is not an existing directory, or on I/O and
/// serialization errors.
pub fn write_json<T: Serialize + ?Sized>(dir: &Path, file_name: &str, value: &T) -> ApiResult<PathBuf> {
    if !dir.is_dir() {
        return Err(ApiError::validation(
            "target-dir",
            format!("{} is not an existing directory", dir.display()),
        ));
    }

    let path = dir.join(file_name);
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(&path, json)?;

    tracing::info!(path = %path.display(), "Wrote export");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory() {
        let dir = std::env::temp_dir().join("pubrecon-missing-export-dir");
        let err = write_json(&dir, "out.json", &[1, 2]).unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[test]
    fn test_writes_pretty_json() {
        let dir = std::env::temp_dir().join(format!("pubrecon-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let path = write_json(&dir, "out.json", &serde_json::json!({"a": [1]})).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains('\n'));
        assert_eq!(serde_json::from_str::<serde_json::Value>(&text).unwrap()["a"][0], 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
