//! # Article Summaries
//!
//! The record extracted from each paper and the YAML document a run writes.
//!
//! ```text
//! articles:
//!   - filename: "Smith 2023 - Graph Transformers.pdf"
//!     objectives: ...
//!     methodology: ...
//! ```

pub mod extract;
pub mod validation;

pub use extract::extract_yaml_block;
pub use validation::{
    bullets, validate, word_count, ValidationReport, ValidationRules, Violation, ViolationKind,
};

use crate::error::RevisorError;
use anyhow::{Context, Result};
use radkit::macros::LLMOutput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Summary fields extracted from one scientific paper
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct ArticleSummary {
    /// PDF file name the summary was extracted from
    #[serde(default)]
    pub filename: String,
    /// Research objectives stated by the authors
    #[serde(default)]
    pub objectives: String,
    /// Research gap the paper addresses
    #[serde(default)]
    pub gap: String,
    /// Methodology, at most 350 words
    #[serde(default)]
    pub methodology: String,
    /// Dataset names as a single comma-separated line
    #[serde(default)]
    pub datasets: String,
    /// Main results, including numeric comparisons
    #[serde(default)]
    pub results: String,
    /// Limitations acknowledged or observed
    #[serde(default)]
    pub limitations: String,
    /// Potential biases
    #[serde(default)]
    pub biases: String,
    /// Authors' conclusion
    #[serde(default)]
    pub conclusion: String,
    /// Future work
    #[serde(default)]
    pub future_work: String,
    /// Specific critical evaluation of the paper
    #[serde(default)]
    pub evaluation: String,
}

impl ArticleSummary {
    /// Field names in template order, paired with their values.
    pub fn fields(&self) -> [(&'static str, &str); 11] {
        [
            ("filename", self.filename.as_str()),
            ("objectives", self.objectives.as_str()),
            ("gap", self.gap.as_str()),
            ("methodology", self.methodology.as_str()),
            ("datasets", self.datasets.as_str()),
            ("results", self.results.as_str()),
            ("limitations", self.limitations.as_str()),
            ("biases", self.biases.as_str()),
            ("conclusion", self.conclusion.as_str()),
            ("future_work", self.future_work.as_str()),
            ("evaluation", self.evaluation.as_str()),
        ]
    }

    /// Dataset names split out of the comma-separated field
    pub fn dataset_names(&self) -> Vec<&str> {
        self.datasets
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Render this single record as a YAML mapping
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize article summary")
    }
}

/// Everything a run produced, one entry per processed PDF
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryDocument {
    #[serde(default)]
    pub articles: Vec<ArticleSummary>,
}

impl SummaryDocument {
    pub fn new(articles: Vec<ArticleSummary>) -> Self {
        Self { articles }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize summary document")
    }

    /// Parse a summary document from YAML or from model output that wraps it.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let body = extract_yaml_block(text).ok_or(RevisorError::NoYamlFound)?;
        let document: SummaryDocument =
            serde_yaml::from_str(body).context("Failed to parse summary YAML")?;
        Ok(document)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read summary file: {:?}", path))?;
        Self::from_yaml(&text).with_context(|| format!("Invalid summary file: {:?}", path))
    }
}

#[cfg(test)]
pub(crate) fn sample_summary() -> ArticleSummary {
    ArticleSummary {
        filename: "Smith 2023 - Graph Transformers for Traffic.pdf".to_string(),
        objectives: "Forecast urban traffic flow with graph transformers.".to_string(),
        gap: "Prior models ignore long-range spatial dependencies.".to_string(),
        methodology: "A graph transformer encodes road sensors as nodes and is trained \
                      with masked pre-training followed by supervised fine-tuning."
            .to_string(),
        datasets: "METR-LA, PEMS-BAY".to_string(),
        results: "MAE drops from 3.60 to 3.12 on METR-LA, a 13% improvement over DCRNN."
            .to_string(),
        limitations: "Evaluated only on freeway sensors.".to_string(),
        biases: "Both datasets come from California.".to_string(),
        conclusion: "Attention over the road graph improves long-horizon forecasts."
            .to_string(),
        future_work: "Extend to multimodal inputs such as weather.".to_string(),
        evaluation: "The ablation isolates pre-training, but the 60-minute horizon gain \
                     rests on a single seed."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_yaml_uses_documented_keys() {
        let document = SummaryDocument::new(vec![sample_summary()]);
        let yaml = document.to_yaml().unwrap();

        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        let record = &value["articles"][0];
        for key in [
            "filename",
            "objectives",
            "gap",
            "methodology",
            "datasets",
            "results",
            "limitations",
            "biases",
            "conclusion",
            "future_work",
            "evaluation",
        ] {
            assert!(record.get(key).is_some(), "missing key {}", key);
        }
    }

    #[test]
    fn test_from_yaml_accepts_fenced_model_output() {
        let text = "Here is the reviewed record:\n```yaml\narticles:\n  \
                    - filename: a.pdf\n    gap: none\n```\nDone.";
        let document = SummaryDocument::from_yaml(text).unwrap();
        assert_eq!(document.articles.len(), 1);
        assert_eq!(document.articles[0].filename, "a.pdf");
        assert_eq!(document.articles[0].objectives, "");
    }

    #[test]
    fn test_from_yaml_without_document_fails() {
        let err = SummaryDocument::from_yaml("no structured content here").unwrap_err();
        assert!(err.to_string().contains("No YAML") || err.to_string().contains("no YAML"));
    }

    #[test]
    fn test_dataset_names() {
        let mut summary = sample_summary();
        summary.datasets = "METR-LA, , PEMS-BAY ,".to_string();
        assert_eq!(summary.dataset_names(), vec!["METR-LA", "PEMS-BAY"]);
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summaries.yaml");
        let document = SummaryDocument::new(vec![sample_summary()]);
        tokio::fs::write(&path, document.to_yaml().unwrap())
            .await
            .unwrap();

        let loaded = SummaryDocument::load(&path).await.unwrap();
        assert_eq!(loaded.articles[0].datasets, "METR-LA, PEMS-BAY");
    }
}
