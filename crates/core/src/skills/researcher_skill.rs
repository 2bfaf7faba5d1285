//! # Researcher Skill
//!
//! A2A-native skill that searches the web for context around a reviewed
//! summary. Uses `search_web` to find related work and applications.

use crate::config::{agent_ids, CrewContext};
use crate::run_llm_worker;
use crate::skills::prompts::{system_prompt, task_prompt, PromptVars};
use crate::skills::tools::search_tools;
use crate::summary::ArticleSummary;
use async_trait::async_trait;
use radkit::agent::{Artifact, OnRequestResult, SkillHandler};
use radkit::errors::{AgentError, AgentResult};
use radkit::macros::{skill, LLMOutput};
use radkit::models::Content;
use radkit::runtime::context::{ProgressSender, State};
use radkit::runtime::AgentRuntime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A source the researcher relied on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct ResearchLink {
    pub title: String,
    pub url: String,
    /// One sentence on why the source matters
    #[serde(default)]
    pub note: String,
}

/// Output from the researcher skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct ResearchOutput {
    /// Synthesis of what was found
    pub summary: String,
    /// Links used
    #[serde(default)]
    pub links: Vec<ResearchLink>,
}

impl ResearchOutput {
    /// Plain-text rendering handed to the writer
    pub fn to_notes(&self) -> String {
        let mut notes = self.summary.trim().to_string();
        if !self.links.is_empty() {
            notes.push_str("\n\nSources:");
            for link in &self.links {
                notes.push_str(&format!("\n- {} ({})", link.title, link.url));
                if !link.note.trim().is_empty() {
                    notes.push_str(&format!(": {}", link.note.trim()));
                }
            }
        }
        notes
    }
}

/// Researcher skill for contextualising a paper
#[skill(
    id = "research",
    name = "Research",
    description = "Searches the web for related work, dataset information and applications of a summarised paper. Returns a synthesis with links.",
    tags = ["research", "search", "context"],
    examples = ["Find follow-up work for this summary"],
    input_modes = ["text/plain", "application/yaml"],
    output_modes = ["application/json"]
)]
pub struct ResearcherSkill {
    context: Arc<CrewContext>,
}

impl ResearcherSkill {
    pub fn new(context: Arc<CrewContext>) -> Self {
        Self { context }
    }

    pub fn build_prompts(
        context: &CrewContext,
        summary: &ArticleSummary,
    ) -> anyhow::Result<(String, String)> {
        let mut vars = PromptVars::new();
        vars.insert("file", summary.filename.clone());
        vars.insert("summary_yaml", summary.to_yaml()?);
        vars.insert("datasets", summary.dataset_names().join(", "));

        let system = system_prompt(&context.prompts.agents.researcher, &vars);
        let mut prompt = task_prompt(&context.prompts.tasks.research, &vars);
        prompt.push_str(&format!(
            "\n\nWhen calling search_web, request up to {} results.",
            context.settings.search_results
        ));
        Ok((system, prompt))
    }

    /// SDK-style call for direct crew integration.
    pub async fn run(
        context: &CrewContext,
        summary: &ArticleSummary,
    ) -> anyhow::Result<ResearchOutput> {
        let config = context.settings.model_config(agent_ids::RESEARCHER);
        let (system, prompt) = Self::build_prompts(context, summary)?;
        run_llm_worker!(
            &config,
            ResearchOutput,
            system.as_str(),
            prompt,
            search_tools::search_web,
        )
    }
}

#[async_trait]
impl SkillHandler for ResearcherSkill {
    async fn on_request(
        &self,
        _state: &mut State,
        progress: &ProgressSender,
        _runtime: &dyn AgentRuntime,
        content: Content,
    ) -> AgentResult<OnRequestResult> {
        let input = content.first_text().unwrap_or_default();
        let summary: ArticleSummary =
            serde_yaml::from_str(input).map_err(|e| AgentError::Internal {
                component: "researcher_skill".to_string(),
                reason: format!("Input is not a summary record: {}", e),
            })?;

        progress.send_update("Searching for context...").await?;

        let result = Self::run(&self.context, &summary)
            .await
            .map_err(|e| AgentError::Internal {
                component: "researcher_skill".to_string(),
                reason: e.to_string(),
            })?;

        progress.send_update("Research complete.").await?;

        let artifact = Artifact::from_json("research.json", &result).map_err(|e| {
            AgentError::Internal {
                component: "researcher_skill".to_string(),
                reason: format!("Failed to create artifact: {}", e),
            }
        })?;

        Ok(OnRequestResult::Completed {
            message: Some(Content::from_text(&result.summary)),
            artifacts: vec![artifact],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::sample_summary;

    #[test]
    fn test_prompt_lists_datasets() {
        let context = CrewContext::bundled().unwrap();
        let (system, prompt) = ResearcherSkill::build_prompts(&context, &sample_summary()).unwrap();
        assert!(system.contains("Research Context Analyst"));
        assert!(prompt.contains("(METR-LA, PEMS-BAY)"));
        assert!(prompt.contains("request up to 5 results"));
    }

    #[test]
    fn test_notes_include_links() {
        let output = ResearchOutput {
            summary: "Two follow-up studies replicate the gains.".to_string(),
            links: vec![
                ResearchLink {
                    title: "Follow-up".to_string(),
                    url: "https://example.org/a".to_string(),
                    note: "Replicates on PEMS-BAY.".to_string(),
                },
                ResearchLink {
                    title: "Dataset card".to_string(),
                    url: "https://example.org/b".to_string(),
                    note: String::new(),
                },
            ],
        };
        let notes = output.to_notes();
        assert!(notes.contains("- Follow-up (https://example.org/a): Replicates on PEMS-BAY."));
        assert!(notes.ends_with("- Dataset card (https://example.org/b)"));
    }
}
