//! # Summary Contract Checks
//!
//! Structural rules every reviewed summary must satisfy.
//!
//! - all fields present and non-empty
//! - `methodology` at most 350 words
//! - `datasets` a single comma-separated line of names
//! - `results` carries at least one number
//! - `evaluation` free of stock phrases

use super::ArticleSummary;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRules {
    /// Word ceiling for `methodology`
    pub max_methodology_words: usize,
    /// A dataset entry longer than this reads like a sentence, not a name
    pub max_dataset_name_words: usize,
    /// Phrases that make an evaluation generic (matched case-insensitively)
    pub generic_phrases: Vec<String>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            max_methodology_words: 350,
            max_dataset_name_words: 8,
            generic_phrases: [
                "this paper is interesting",
                "well written",
                "well-written",
                "valuable contribution",
                "significant contribution",
                "further research is needed",
                "the results are promising",
                "overall, the paper",
                "overall, this study",
                "an important topic",
                "a good paper",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

// ============================================================================
// Violation Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ViolationKind {
    Missing,
    TooLong { words: usize, limit: usize },
    NotAList,
    NoNumbers,
    GenericLanguage { phrase: String },
    FilenameMismatch { expected: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    #[serde(flatten)]
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    fn new(field: &str, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub filename: String,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Flag a record whose `filename` differs from the PDF it came from.
    pub fn check_filename(&mut self, summary: &ArticleSummary, expected: &str) {
        if !summary.filename.is_empty() && summary.filename != expected {
            self.violations.push(Violation::new(
                "filename",
                ViolationKind::FilenameMismatch {
                    expected: expected.to_string(),
                },
                format!("expected '{}', found '{}'", expected, summary.filename),
            ));
        }
    }

    /// Bullet list handed back to the reviewer on another pass
    pub fn to_bullets(&self) -> String {
        bullets(&self.violations)
    }
}

/// One `- field: message` line per violation
pub fn bullets(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("- {}", v))
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Checks
// ============================================================================

/// Number of whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").expect("number pattern is valid"));

/// Check a summary against the contract.
pub fn validate(summary: &ArticleSummary, rules: &ValidationRules) -> ValidationReport {
    let mut report = ValidationReport {
        filename: summary.filename.clone(),
        violations: Vec::new(),
    };

    for (field, value) in summary.fields() {
        if value.trim().is_empty() {
            report
                .violations
                .push(Violation::new(field, ViolationKind::Missing, "field is empty"));
        }
    }

    let words = word_count(&summary.methodology);
    if words > rules.max_methodology_words {
        report.violations.push(Violation::new(
            "methodology",
            ViolationKind::TooLong {
                words,
                limit: rules.max_methodology_words,
            },
            format!("{} words, limit is {}", words, rules.max_methodology_words),
        ));
    }

    if !summary.datasets.trim().is_empty() {
        if let Some(reason) = dataset_list_problem(&summary.datasets, rules) {
            report
                .violations
                .push(Violation::new("datasets", ViolationKind::NotAList, reason));
        }
    }

    if !summary.results.trim().is_empty() && !NUMBER.is_match(&summary.results) {
        report.violations.push(Violation::new(
            "results",
            ViolationKind::NoNumbers,
            "results must include numeric comparisons",
        ));
    }

    let evaluation = summary.evaluation.to_lowercase();
    for phrase in &rules.generic_phrases {
        if evaluation.contains(&phrase.to_lowercase()) {
            report.violations.push(Violation::new(
                "evaluation",
                ViolationKind::GenericLanguage {
                    phrase: phrase.clone(),
                },
                format!("generic phrase '{}'", phrase),
            ));
        }
    }

    report
}

fn dataset_list_problem(datasets: &str, rules: &ValidationRules) -> Option<String> {
    let trimmed = datasets.trim();
    if trimmed.contains('\n') {
        return Some("must be a single line".to_string());
    }
    if trimmed.starts_with(['-', '*', '•']) {
        return Some("must not be a bullet list".to_string());
    }

    let items: Vec<&str> = trimmed
        .trim_end_matches(['.', ','])
        .split(',')
        .map(str::trim)
        .collect();
    if items.iter().any(|item| item.is_empty()) {
        return Some("contains an empty entry".to_string());
    }
    if let Some(long) = items
        .iter()
        .find(|item| word_count(item) > rules.max_dataset_name_words)
    {
        return Some(format!("'{}' is a sentence, not a dataset name", long));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::sample_summary;

    #[test]
    fn test_sample_is_valid() {
        let report = validate(&sample_summary(), &ValidationRules::default());
        assert!(report.is_valid(), "{:?}", report.violations);
    }

    #[test]
    fn test_every_empty_field_is_reported() {
        let report = validate(&ArticleSummary::default(), &ValidationRules::default());
        let missing = report
            .violations
            .iter()
            .filter(|v| v.kind == ViolationKind::Missing)
            .count();
        assert_eq!(missing, 11);
    }

    #[test]
    fn test_methodology_word_limit() {
        let mut summary = sample_summary();
        summary.methodology = vec!["word"; 351].join(" ");
        let report = validate(&summary, &ValidationRules::default());
        assert_eq!(
            report.violations[0].kind,
            ViolationKind::TooLong {
                words: 351,
                limit: 350
            }
        );

        summary.methodology = vec!["word"; 350].join(" ");
        assert!(validate(&summary, &ValidationRules::default()).is_valid());
    }

    #[test]
    fn test_dataset_list_shapes() {
        let rules = ValidationRules::default();
        let mut summary = sample_summary();

        summary.datasets = "- METR-LA\n- PEMS-BAY".to_string();
        assert_eq!(validate(&summary, &rules).violations[0].kind, ViolationKind::NotAList);

        summary.datasets = "METR-LA,,PEMS-BAY".to_string();
        assert!(!validate(&summary, &rules).is_valid());

        summary.datasets = "The authors collected sensor readings from hundreds of highway loops"
            .to_string();
        assert!(!validate(&summary, &rules).is_valid());

        summary.datasets = "ImageNet".to_string();
        assert!(validate(&summary, &rules).is_valid());

        summary.datasets = "ImageNet, COCO.".to_string();
        assert!(validate(&summary, &rules).is_valid());
    }

    #[test]
    fn test_results_need_numbers() {
        let mut summary = sample_summary();
        summary.results = "The model clearly outperforms the baselines.".to_string();
        let report = validate(&summary, &ValidationRules::default());
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].kind, ViolationKind::NoNumbers);
    }

    #[test]
    fn test_generic_evaluation() {
        let mut summary = sample_summary();
        summary.evaluation = "Overall, the paper is Well Written.".to_string();
        let report = validate(&summary, &ValidationRules::default());
        assert_eq!(report.violations.len(), 2);
        assert!(report.to_bullets().contains("- evaluation: generic phrase"));
    }

    #[test]
    fn test_filename_mismatch() {
        let summary = sample_summary();
        let mut report = validate(&summary, &ValidationRules::default());
        report.check_filename(&summary, "other.pdf");
        assert!(matches!(
            report.violations[0].kind,
            ViolationKind::FilenameMismatch { .. }
        ));
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("  one two\nthree\t four "), 4);
        assert_eq!(word_count(""), 0);
    }
}
