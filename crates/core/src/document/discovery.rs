//! Finding the papers to process.

use crate::error::RevisorError;
use anyhow::{Context, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// List PDF files under `dir` whose file name matches `pattern`, sorted by name.
///
/// Hidden entries are skipped. Only the top level is scanned unless `recursive`.
pub fn discover_pdfs(dir: &Path, pattern: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(RevisorError::MissingDirectory(dir.to_path_buf()).into());
    }
    let pattern =
        Pattern::new(pattern).with_context(|| format!("Invalid file pattern: {}", pattern))?;

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_pdf = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        let name = entry.file_name().to_string_lossy();
        if is_pdf && pattern.matches(&name) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}
