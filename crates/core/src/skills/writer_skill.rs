//! # Writer Skill
//!
//! A2A-native skill that turns a reviewed summary and research notes into a
//! LinkedIn article in Markdown.

use crate::config::{agent_ids, CrewContext};
use crate::run_llm_function;
use crate::skills::prompts::{system_prompt, task_prompt, PromptVars};
use crate::skills::researcher_skill::ResearchOutput;
use crate::summary::extract::strip_markdown_fence;
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

const NO_RESEARCH: &str = "No research notes for this paper; rely on the summary only.";

/// Output from the writer skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct ArticleDraft {
    /// Article headline
    pub title: String,
    /// Full article body in Markdown
    pub markdown: String,
}

impl ArticleDraft {
    /// Markdown without a surrounding code fence
    pub fn cleaned(mut self) -> Self {
        self.markdown = strip_markdown_fence(&self.markdown).to_string();
        self
    }
}

/// Writer skill for drafting the article
#[skill(
    id = "write_article",
    name = "Write Article",
    description = "Writes a LinkedIn-style Markdown article from a reviewed paper summary and optional research notes.",
    tags = ["writing", "markdown", "linkedin"],
    examples = ["Write a LinkedIn post about this summary"],
    input_modes = ["text/plain", "application/yaml"],
    output_modes = ["text/markdown", "application/json"]
)]
pub struct WriterSkill {
    context: Arc<CrewContext>,
}

impl WriterSkill {
    pub fn new(context: Arc<CrewContext>) -> Self {
        Self { context }
    }

    pub fn build_prompts(
        context: &CrewContext,
        summary: &ArticleSummary,
        research: Option<&ResearchOutput>,
    ) -> anyhow::Result<(String, String)> {
        let mut vars = PromptVars::new();
        vars.insert("file", summary.filename.clone());
        vars.insert("summary_yaml", summary.to_yaml()?);
        vars.insert(
            "research",
            research
                .map(ResearchOutput::to_notes)
                .unwrap_or_else(|| NO_RESEARCH.to_string()),
        );

        let system = system_prompt(&context.prompts.agents.writer, &vars);
        let prompt = task_prompt(&context.prompts.tasks.write_article.spec, &vars);
        Ok((system, prompt))
    }

    /// SDK-style call for direct crew integration.
    pub async fn run(
        context: &CrewContext,
        summary: &ArticleSummary,
        research: Option<&ResearchOutput>,
    ) -> anyhow::Result<ArticleDraft> {
        let config = context.settings.model_config(agent_ids::WRITER);
        let (system, prompt) = Self::build_prompts(context, summary, research)?;
        let draft = run_llm_function!(&config, ArticleDraft, system.as_str(), prompt)?;
        Ok(draft.cleaned())
    }
}

#[async_trait]
impl SkillHandler for WriterSkill {
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
                component: "writer_skill".to_string(),
                reason: format!("Input is not a summary record: {}", e),
            })?;

        progress.send_update("Drafting article...").await?;

        let draft = Self::run(&self.context, &summary, None)
            .await
            .map_err(|e| AgentError::Internal {
                component: "writer_skill".to_string(),
                reason: e.to_string(),
            })?;

        progress.send_update("Article ready.").await?;

        let artifact = Artifact::from_json("article.json", &draft).map_err(|e| {
            AgentError::Internal {
                component: "writer_skill".to_string(),
                reason: format!("Failed to create artifact: {}", e),
            }
        })?;

        Ok(OnRequestResult::Completed {
            message: Some(Content::from_text(&draft.markdown)),
            artifacts: vec![artifact],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::researcher_skill::ResearchLink;
    use crate::summary::sample_summary;

    #[test]
    fn test_prompt_without_research() {
        let context = CrewContext::bundled().unwrap();
        let (system, prompt) =
            WriterSkill::build_prompts(&context, &sample_summary(), None).unwrap();
        assert!(system.contains("Science Communication Writer"));
        assert!(prompt.contains(NO_RESEARCH));
        assert!(prompt.contains("hashtags"));
    }

    #[test]
    fn test_prompt_with_research_notes() {
        let context = CrewContext::bundled().unwrap();
        let research = ResearchOutput {
            summary: "Adopted by two city traffic agencies.".to_string(),
            links: vec![ResearchLink {
                title: "City pilot".to_string(),
                url: "https://example.org/pilot".to_string(),
                note: String::new(),
            }],
        };
        let (_, prompt) =
            WriterSkill::build_prompts(&context, &sample_summary(), Some(&research)).unwrap();
        assert!(prompt.contains("Adopted by two city traffic agencies."));
        assert!(prompt.contains("https://example.org/pilot"));
    }

    #[test]
    fn test_cleaned_strips_fence() {
        let draft = ArticleDraft {
            title: "T".to_string(),
            markdown: "```markdown\n# T\n\nBody\n```".to_string(),
        };
        assert_eq!(draft.cleaned().markdown, "# T\n\nBody");
    }
}
