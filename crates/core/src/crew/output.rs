//! # Run Output
//!
//! Timestamped YAML and Markdown files under the output directory.

use crate::summary::SummaryDocument;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Timestamp shared by every file of one run (`YYYYmmdd_HHMMSS`, local time)
pub fn run_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

fn article_stem(pdf_filename: &str) -> String {
    Path::new(pdf_filename)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "article".to_string())
}

/// `<pdf stem>_<timestamp>.md`
pub fn article_file_name(pdf_filename: &str, timestamp: &str) -> String {
    format!("{}_{}.md", article_stem(pdf_filename), timestamp)
}

/// Article file names handed out during one run.
///
/// Papers sharing a file name (possible with recursive discovery) get
/// `<stem>_2_<timestamp>.md`, `<stem>_3_<timestamp>.md` and so on.
#[derive(Debug)]
pub struct ArticleNames {
    timestamp: String,
    taken: HashSet<String>,
}

impl ArticleNames {
    pub fn new(timestamp: &str) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            taken: HashSet::new(),
        }
    }

    /// Next free name for an article about `pdf_filename`
    pub fn next(&mut self, pdf_filename: &str) -> String {
        let stem = article_stem(pdf_filename);
        let mut name = article_file_name(pdf_filename, &self.timestamp);
        let mut n = 2;
        while !self.taken.insert(name.clone()) {
            name = format!("{}_{}_{}.md", stem, n, self.timestamp);
            n += 1;
        }
        name
    }
}

async fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write file: {:?}", path))
}

/// Write `summaries_<timestamp>.yaml` into `dir`.
pub async fn write_summaries(
    dir: &Path,
    document: &SummaryDocument,
    timestamp: &str,
) -> Result<PathBuf> {
    let path = dir.join(format!("summaries_{}.yaml", timestamp));
    write_file(&path, &document.to_yaml()?).await?;
    tracing::info!(path = %path.display(), count = document.articles.len(), "Saved summaries");
    Ok(path)
}

/// Write one article into `dir`, named after the paper it came from.
pub async fn write_article(
    dir: &Path,
    pdf_filename: &str,
    markdown: &str,
    names: &mut ArticleNames,
) -> Result<PathBuf> {
    let path = dir.join(names.next(pdf_filename));
    let mut content = markdown.trim_end().to_string();
    content.push('\n');
    write_file(&path, &content).await?;
    tracing::info!(path = %path.display(), "Saved article");
    Ok(path)
}
