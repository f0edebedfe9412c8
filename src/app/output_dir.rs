//! Run-scoped output folder.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crate::config::RUN_DIR_PREFIX;

/// Creates `<base>/output_YYYY-MM-DD_HH-MM-SS`, including missing parents.
///
/// If a folder with the same timestamp already exists (two runs started in
/// the same second), a numeric suffix is appended so runs never share logs.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn create_run_dir(base: &Path) -> Result<PathBuf> {
    let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let mut candidate = base.join(format!("{RUN_DIR_PREFIX}{stamp}"));
    let mut suffix = 1u32;
    while candidate.exists() {
        candidate = base.join(format!("{RUN_DIR_PREFIX}{stamp}_{suffix}"));
        suffix += 1;
    }
    std::fs::create_dir_all(&candidate)
        .with_context(|| format!("Failed to create output directory {}", candidate.display()))?;
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_run_dir_under_missing_base() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let base = tmp.path().join("results").join("nested");
        let dir = create_run_dir(&base).expect("create");

        assert!(dir.is_dir());
        assert_eq!(dir.parent(), Some(base.as_path()));
        let name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .expect("utf-8 name");
        assert!(name.starts_with("output_"));
        // output_ + YYYY-MM-DD_HH-MM-SS
        assert_eq!(name.len(), "output_".len() + 19);
    }

    #[test]
    fn test_create_run_dir_twice_gives_distinct_dirs() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let first = create_run_dir(tmp.path()).expect("first");
        let second = create_run_dir(tmp.path()).expect("second");
        assert_ne!(first, second);
    }
}
