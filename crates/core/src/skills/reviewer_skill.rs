//! # Reviewer Skill
//!
//! A2A-native skill that checks a candidate summary against the extraction
//! instructions and returns a corrected record.

use crate::config::{agent_ids, CrewContext};
use crate::run_llm_function;
use crate::skills::prompts::{system_prompt, task_prompt, PromptVars};
use crate::summary::{bullets, validate, ArticleSummary, Violation};
use async_trait::async_trait;
use radkit::agent::{Artifact, OnRequestResult, SkillHandler};
use radkit::errors::{AgentError, AgentResult};
use radkit::macros::skill;
use radkit::models::Content;
use radkit::runtime::context::{ProgressSender, State};
use radkit::runtime::AgentRuntime;
use std::sync::Arc;

/// Reviewer skill for enforcing the summary contract
#[skill(
    id = "review_summary",
    name = "Review Summary",
    description = "Reviews a candidate paper summary against its template and field constraints and returns a corrected record.",
    tags = ["review", "quality", "yaml"],
    examples = ["Review this summary YAML"],
    input_modes = ["text/plain", "application/yaml"],
    output_modes = ["application/json"]
)]
pub struct ReviewerSkill {
    context: Arc<CrewContext>,
}

impl ReviewerSkill {
    pub fn new(context: Arc<CrewContext>) -> Self {
        Self { context }
    }

    pub fn build_prompts(
        context: &CrewContext,
        draft: &ArticleSummary,
        violations: &[Violation],
    ) -> anyhow::Result<(String, String)> {
        let inputs = &context.prompts.tasks.read_pdf.inputs;
        let mut vars = PromptVars::new();
        vars.insert("file", draft.filename.clone());
        vars.insert("summary_yaml", draft.to_yaml()?);
        vars.insert("requests", inputs.requests.clone());
        vars.insert("template", inputs.template.replace("{file}", &draft.filename));
        vars.insert("controls", inputs.controls.clone());
        vars.insert("restrictions", inputs.restrictions.clone());
        vars.insert("violations", format_violations(violations));

        let system = system_prompt(&context.prompts.agents.yaml_reviewer, &vars);
        let prompt = task_prompt(&context.prompts.tasks.review_yaml, &vars);
        Ok((system, prompt))
    }

    /// SDK-style call for direct crew integration.
    ///
    /// Like the reader, the model's `filename` is returned unchanged.
    pub async fn run(
        context: &CrewContext,
        draft: &ArticleSummary,
        violations: &[Violation],
    ) -> anyhow::Result<ArticleSummary> {
        let config = context.settings.model_config(agent_ids::REVIEWER);
        let (system, prompt) = Self::build_prompts(context, draft, violations)?;

        run_llm_function!(&config, ArticleSummary, system.as_str(), prompt)
    }
}

fn format_violations(violations: &[Violation]) -> String {
    if violations.is_empty() {
        return "None detected; still verify every control.".to_string();
    }
    bullets(violations)
}

#[async_trait]
impl SkillHandler for ReviewerSkill {
    async fn on_request(
        &self,
        _state: &mut State,
        progress: &ProgressSender,
        _runtime: &dyn AgentRuntime,
        content: Content,
    ) -> AgentResult<OnRequestResult> {
        let input = content.first_text().unwrap_or_default();

        let draft: ArticleSummary =
            serde_yaml::from_str(input).map_err(|e| AgentError::Internal {
                component: "reviewer_skill".to_string(),
                reason: format!("Input is not a summary record: {}", e),
            })?;

        progress.send_update("Checking field constraints...").await?;
        let report = validate(&draft, &self.context.settings.validation);

        progress.send_update("Reviewing summary...").await?;

        let mut reviewed = Self::run(&self.context, &draft, &report.violations)
            .await
            .map_err(|e| AgentError::Internal {
                component: "reviewer_skill".to_string(),
                reason: e.to_string(),
            })?;
        reviewed.filename = draft.filename.clone();

        let remaining = validate(&reviewed, &self.context.settings.validation);
        progress.send_update("Review complete.").await?;

        let artifact = Artifact::from_json("summary.json", &reviewed).map_err(|e| {
            AgentError::Internal {
                component: "reviewer_skill".to_string(),
                reason: format!("Failed to create artifact: {}", e),
            }
        })?;

        Ok(OnRequestResult::Completed {
            message: Some(Content::from_text(&format!(
                "Reviewed {} ({} issues before, {} after)",
                reviewed.filename,
                report.violations.len(),
                remaining.violations.len()
            ))),
            artifacts: vec![artifact],
        })
    }
}
