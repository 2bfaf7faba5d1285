//! # PDF Tools
//!
//! Passage search over the paper currently being read.

use crate::document::DocumentStore;
use radkit::macros::tool;
use radkit::tools::ToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;

/// Arguments for PDF search
#[derive(Deserialize, JsonSchema)]
pub struct SearchPdfArgs {
    /// Path of the PDF, exactly as given in the task
    pub path: String,
    /// Keywords to look for (e.g. "dataset benchmark", "limitations")
    pub query: String,
    /// Maximum number of passages (default: 5)
    pub max_results: Option<u32>,
}

/// Search a PDF for the passages most relevant to a query
#[tool(
    description = "Search the text of a PDF paper. Returns the best matching passages with their page numbers."
)]
pub async fn search_pdf(args: SearchPdfArgs) -> ToolResult {
    let max_results = args.max_results.unwrap_or(5).max(1) as usize;
    let path = PathBuf::from(&args.path);

    // Papers the crew registered are served from the cache; anything else is
    // extracted for this call only
    let document = match DocumentStore::global().open_uncached(&path).await {
        Ok(document) => document,
        Err(e) => return ToolResult::error(format!("Failed to open '{}': {}", args.path, e)),
    };

    let passages = document.search(&args.query, max_results);
    tracing::debug!(
        file = %document.file_name,
        query = %args.query,
        hits = passages.len(),
        "search_pdf"
    );

    if passages.is_empty() {
        return ToolResult::success(json!({
            "file": document.file_name,
            "query": args.query,
            "passages": [],
            "message": "No passage matched. Try different or more specific keywords."
        }));
    }

    ToolResult::success(json!({
        "file": document.file_name,
        "query": args.query,
        "passages": passages
    }))
}
