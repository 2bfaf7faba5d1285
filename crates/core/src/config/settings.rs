//! # Crew Settings
//!
//! Runtime knobs persisted as JSON under the Revisor home directory
//! (`$REVISOR_HOME`, or `./.revisor`). Command-line flags are layered on top.

use crate::models::{LlmProvider, ModelConfig};
use crate::summary::ValidationRules;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "config.json";

/// How the final article is produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleMode {
    /// The writer agent drafts the article
    #[default]
    Llm,
    /// Fixed template filled from the summary, no model call
    Template,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrewSettings {
    /// Directory holding the input PDFs
    pub pdf_dir: PathBuf,
    /// Root for `yamls/` and `articles/`
    pub output_dir: PathBuf,
    /// Directory with `agents.yaml` / `tasks.yaml` overrides
    pub config_dir: Option<PathBuf>,
    /// Glob applied to PDF file names
    pub pattern: String,
    pub recursive: bool,
    /// Run the web research stage
    pub research_enabled: bool,
    pub article_mode: ArticleMode,
    /// Review passes before moving on with remaining violations
    pub max_review_passes: u32,
    /// Leading characters of the paper included in the reader prompt
    pub max_document_chars: usize,
    /// Results per `search_pdf` / `search_web` call
    pub search_results: u32,
    pub global_provider: LlmProvider,
    pub global_model: Option<String>,
    /// Base URL override for OpenAI-compatible endpoints
    pub base_url: Option<String>,
    /// Per-agent provider overrides (agent_id -> provider)
    pub per_agent_providers: HashMap<String, LlmProvider>,
    /// Per-agent model overrides (agent_id -> model name)
    pub per_agent_models: HashMap<String, String>,
    /// Per-agent base URL overrides (agent_id -> base_url, OpenAI only)
    pub per_agent_base_urls: HashMap<String, String>,
    pub validation: ValidationRules,
}

impl Default for CrewSettings {
    fn default() -> Self {
        Self {
            pdf_dir: PathBuf::from("resources/pdfs"),
            output_dir: PathBuf::from("resources"),
            config_dir: None,
            pattern: "*.pdf".to_string(),
            recursive: false,
            research_enabled: true,
            article_mode: ArticleMode::Llm,
            max_review_passes: 1,
            max_document_chars: 60_000,
            search_results: 5,
            global_provider: LlmProvider::OpenAI,
            global_model: None,
            base_url: None,
            per_agent_providers: HashMap::new(),
            per_agent_models: HashMap::new(),
            per_agent_base_urls: HashMap::new(),
            validation: ValidationRules::default(),
        }
    }
}

/// Revisor home directory
pub fn home_dir() -> PathBuf {
    if let Ok(path) = std::env::var("REVISOR_HOME") {
        return PathBuf::from(path);
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".revisor")
}

impl CrewSettings {
    /// Load `config.json` from `dir`, or defaults when it does not exist.
    pub async fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(SETTINGS_FILE);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Invalid settings file: {:?}", path)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("Failed to read file: {:?}", path)),
        }
    }

    pub async fn save(&self, dir: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create directory: {:?}", dir))?;
        let path = dir.join(SETTINGS_FILE);
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write file: {:?}", path))?;
        Ok(path)
    }

    /// Model config for a specific agent
    pub fn model_config(&self, agent_id: &str) -> ModelConfig {
        // Provider: per-agent override -> global
        let provider = self
            .per_agent_providers
            .get(agent_id)
            .cloned()
            .unwrap_or_else(|| self.global_provider.clone());

        // Model: per-agent override -> global -> default for provider
        let model = self
            .per_agent_models
            .get(agent_id)
            .or(self.global_model.as_ref())
            .cloned()
            .unwrap_or_else(|| provider.default_model().to_string());

        // Base URL: per-agent override -> global (only for OpenAI)
        let base_url = if provider.supports_base_url() {
            self.per_agent_base_urls
                .get(agent_id)
                .or(self.base_url.as_ref())
                .cloned()
        } else {
            None
        };

        ModelConfig {
            provider,
            model,
            base_url,
        }
    }

    /// Distinct model configs used by a run, for credential checks
    pub fn model_configs(&self, agent_ids: &[&str]) -> Vec<ModelConfig> {
        let mut configs: Vec<ModelConfig> = Vec::new();
        for id in agent_ids {
            let config = self.model_config(id);
            if !configs.iter().any(|c| c.provider == config.provider) {
                configs.push(config);
            }
        }
        configs
    }

    pub fn yaml_dir(&self) -> PathBuf {
        self.output_dir.join("yamls")
    }

    pub fn articles_dir(&self) -> PathBuf {
        self.output_dir.join("articles")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_single_review_pass() {
        let settings = CrewSettings::default();
        assert_eq!(settings.max_review_passes, 1);
        assert!(settings.research_enabled);
        assert_eq!(settings.article_mode, ArticleMode::Llm);
        assert_eq!(settings.yaml_dir(), PathBuf::from("resources/yamls"));
    }

    #[test]
    fn test_model_resolution_order() {
        let mut settings = CrewSettings::default();
        assert_eq!(settings.model_config("writer").model, "gpt-4o-mini");

        settings.global_model = Some("gpt-4o".to_string());
        settings
            .per_agent_models
            .insert("pdf_reader".to_string(), "gpt-4.1".to_string());
        settings
            .per_agent_providers
            .insert("researcher".to_string(), LlmProvider::Anthropic);
        settings.base_url = Some("http://localhost:11434/v1".to_string());

        assert_eq!(settings.model_config("pdf_reader").model, "gpt-4.1");
        assert_eq!(settings.model_config("writer").model, "gpt-4o");
        assert_eq!(
            settings.model_config("writer").base_url.as_deref(),
            Some("http://localhost:11434/v1")
        );

        let researcher = settings.model_config("researcher");
        assert_eq!(researcher.provider, LlmProvider::Anthropic);
        assert_eq!(researcher.base_url, None);
    }

    #[test]
    fn test_model_configs_deduplicate_providers() {
        let mut settings = CrewSettings::default();
        settings
            .per_agent_providers
            .insert("writer".to_string(), LlmProvider::Gemini);
        let configs = settings.model_configs(&["pdf_reader", "yaml_reviewer", "writer"]);
        assert_eq!(configs.len(), 2);
    }

    #[tokio::test]
    async fn test_save_and_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            CrewSettings::load(dir.path()).await.unwrap().pattern,
            "*.pdf"
        );

        tokio::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"research_enabled": false, "article_mode": "template"}"#,
        )
        .await
        .unwrap();
        let loaded = CrewSettings::load(dir.path()).await.unwrap();
        assert!(!loaded.research_enabled);
        assert_eq!(loaded.article_mode, ArticleMode::Template);
        assert_eq!(loaded.max_review_passes, 1);

        let path = loaded.save(dir.path()).await.unwrap();
        assert!(path.ends_with(SETTINGS_FILE));
    }
}
