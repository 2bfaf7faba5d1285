//! # Crew Prompt Files
//!
//! `agents.yaml` holds the role, goal and backstory of each agent;
//! `tasks.yaml` holds the description and expected output of each task.
//! Both ship with bundled defaults and can be overridden from a directory.

use crate::error::RevisorError;
use crate::skills::prompts;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const AGENTS_FILE: &str = "agents.yaml";
pub const TASKS_FILE: &str = "tasks.yaml";

/// Role, goal and backstory of one agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentsFile {
    pub pdf_reader: AgentProfile,
    pub yaml_reviewer: AgentProfile,
    pub researcher: AgentProfile,
    pub writer: AgentProfile,
}

/// Description and expected output of one task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub description: String,
    pub expected_output: String,
}

/// Instruction blocks interpolated into the reading and review tasks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadInputs {
    #[serde(default)]
    pub requests: String,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub controls: String,
    #[serde(default)]
    pub restrictions: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadTask {
    #[serde(flatten)]
    pub spec: TaskSpec,
    #[serde(default)]
    pub inputs: ReadInputs,
}

/// Fixed pieces of the template-rendered LinkedIn article
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleTemplate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub hook: String,
    /// Section key (`gap`, `objectives`, `methodology`, `results`) -> heading
    #[serde(default)]
    pub sections: BTreeMap<String, String>,
    #[serde(default)]
    pub call_to_action: String,
    #[serde(default)]
    pub hashtags: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteTask {
    #[serde(flatten)]
    pub spec: TaskSpec,
    #[serde(default)]
    pub article: ArticleTemplate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TasksFile {
    pub read_pdf: ReadTask,
    pub review_yaml: TaskSpec,
    pub research: TaskSpec,
    pub write_article: WriteTask,
}

/// Agent and task prompts for one run
#[derive(Debug, Clone, PartialEq)]
pub struct CrewPrompts {
    pub agents: AgentsFile,
    pub tasks: TasksFile,
}

impl CrewPrompts {
    /// Prompts compiled into the binary
    pub fn bundled() -> Result<Self> {
        Ok(Self {
            agents: parse_yaml(prompts::AGENTS_YAML, Path::new(AGENTS_FILE))?,
            tasks: parse_yaml(prompts::TASKS_YAML, Path::new(TASKS_FILE))?,
        })
    }

    /// Load overrides from `dir`; a missing file falls back to the bundled default.
    pub async fn load(dir: Option<&Path>) -> Result<Self> {
        let mut prompts = Self::bundled()?;
        let Some(dir) = dir else {
            return Ok(prompts);
        };

        if let Some(agents) = read_override::<AgentsFile>(&dir.join(AGENTS_FILE)).await? {
            prompts.agents = agents;
        }
        if let Some(tasks) = read_override::<TasksFile>(&dir.join(TASKS_FILE)).await? {
            prompts.tasks = tasks;
        }
        Ok(prompts)
    }

    /// Write the bundled prompt files into `dir` for editing.
    ///
    /// Existing files are kept unless `force`. Returns the files written.
    pub async fn write_defaults(dir: &Path, force: bool) -> Result<Vec<String>> {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create config directory: {:?}", dir))?;

        let mut written = Vec::new();
        for (name, content) in prompts::all_defaults() {
            let path = dir.join(name);
            if !force && tokio::fs::try_exists(&path).await.unwrap_or(false) {
                tracing::info!("Keeping existing {:?}", path);
                continue;
            }
            tokio::fs::write(&path, content)
                .await
                .with_context(|| format!("Failed to write file: {:?}", path))?;
            written.push(name.to_string());
        }
        Ok(written)
    }
}

fn parse_yaml<T: DeserializeOwned>(text: &str, path: &Path) -> Result<T> {
    serde_yaml::from_str(text).map_err(|e| {
        RevisorError::InvalidConfig {
            file: path.to_path_buf(),
            reason: e.to_string(),
        }
        .into()
    })
}

async fn read_override<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => {
            let parsed = parse_yaml(&text, path)?;
            tracing::info!("Loaded prompt overrides from {:?}", path);
            Ok(Some(parsed))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read file: {:?}", path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_prompts_parse() {
        let prompts = CrewPrompts::bundled().unwrap();
        assert!(prompts.agents.pdf_reader.role.contains("Reader"));
        assert!(prompts.tasks.read_pdf.inputs.controls.contains("350 words"));
        assert!(prompts.tasks.read_pdf.inputs.template.contains("future_work"));
        assert_eq!(prompts.tasks.write_article.article.sections.len(), 4);
    }

    #[tokio::test]
    async fn test_load_without_dir_uses_bundled() {
        let loaded = CrewPrompts::load(None).await.unwrap();
        assert_eq!(loaded, CrewPrompts::bundled().unwrap());
    }

    #[tokio::test]
    async fn test_partial_override() {
        let dir = tempfile::tempdir().unwrap();
        let mut agents = CrewPrompts::bundled().unwrap().agents;
        agents.writer.role = "Newsletter Editor".to_string();
        tokio::fs::write(
            dir.path().join(AGENTS_FILE),
            serde_yaml::to_string(&agents).unwrap(),
        )
        .await
        .unwrap();

        let loaded = CrewPrompts::load(Some(dir.path())).await.unwrap();
        assert_eq!(loaded.agents.writer.role, "Newsletter Editor");
        assert_eq!(loaded.tasks, CrewPrompts::bundled().unwrap().tasks);
    }

    #[tokio::test]
    async fn test_broken_override_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join(TASKS_FILE), "read_pdf: [unclosed")
            .await
            .unwrap();

        let err = CrewPrompts::load(Some(dir.path())).await.unwrap_err();
        assert!(err.to_string().contains("tasks.yaml"));
    }

    #[tokio::test]
    async fn test_write_defaults_keeps_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join(AGENTS_FILE), "custom")
            .await
            .unwrap();

        let written = CrewPrompts::write_defaults(dir.path(), false).await.unwrap();
        assert_eq!(written, vec![TASKS_FILE.to_string()]);
        let kept = tokio::fs::read_to_string(dir.path().join(AGENTS_FILE))
            .await
            .unwrap();
        assert_eq!(kept, "custom");

        let written = CrewPrompts::write_defaults(dir.path(), true).await.unwrap();
        assert_eq!(written.len(), 2);
    }
}
