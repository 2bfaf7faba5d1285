//! # Reader Skill
//!
//! A2A-native skill that reads a paper and fills in the summary template.
//! Uses `search_pdf` to look up sections of the document on demand.

use crate::config::{agent_ids, CrewContext};
use crate::document::{DocumentStore, PdfDocument};
use crate::run_llm_worker;
use crate::skills::prompts::{interpolate, system_prompt, task_prompt, PromptVars};
use crate::skills::tools::pdf_tools;
use crate::summary::ArticleSummary;
use async_trait::async_trait;
use radkit::agent::{Artifact, OnRequestResult, SkillHandler};
use radkit::errors::{AgentError, AgentResult};
use radkit::macros::skill;
use radkit::models::Content;
use radkit::runtime::context::{ProgressSender, State};
use radkit::runtime::AgentRuntime;
use std::path::PathBuf;
use std::sync::Arc;

/// Reader skill for extracting summary fields from a PDF
#[skill(
    id = "read_pdf",
    name = "Read Paper",
    description = "Reads a scientific PDF and extracts objectives, gap, methodology, datasets, results, limitations, biases, conclusion, future work and an evaluation.",
    tags = ["pdf", "extraction", "summary"],
    examples = ["Summarise resources/pdfs/Smith 2023 - Graph Transformers.pdf"],
    input_modes = ["text/plain"],
    output_modes = ["application/json"]
)]
pub struct ReaderSkill {
    context: Arc<CrewContext>,
}

impl ReaderSkill {
    pub fn new(context: Arc<CrewContext>) -> Self {
        Self { context }
    }

    /// Placeholder values for the reading task
    pub fn prompt_vars(context: &CrewContext, document: &PdfDocument) -> PromptVars {
        let inputs = &context.prompts.tasks.read_pdf.inputs;
        let mut vars = PromptVars::new();
        vars.insert("file", document.file_name.clone());
        vars.insert("path", document.path.display().to_string());

        // The template carries its own {file} placeholder for the filename field
        let template = interpolate(&inputs.template, &vars);
        vars.insert("template", template);
        vars.insert("requests", inputs.requests.clone());
        vars.insert("controls", inputs.controls.clone());
        vars.insert("restrictions", inputs.restrictions.clone());
        vars
    }

    /// System instructions and user prompt for one paper
    pub fn build_prompts(context: &CrewContext, document: &PdfDocument) -> (String, String) {
        let vars = Self::prompt_vars(context, document);
        let system = system_prompt(&context.prompts.agents.pdf_reader, &vars);
        let mut prompt = task_prompt(&context.prompts.tasks.read_pdf.spec, &vars);

        prompt.push_str(&format!(
            "\n\nWhen calling search_pdf, use path \"{}\" and request up to {} passages.",
            document.path.display(),
            context.settings.search_results
        ));
        prompt.push_str(&format!(
            "\n\nOpening of the document ({} of {} characters):\n{}",
            context.settings.max_document_chars.min(document.char_len()),
            document.char_len(),
            document.excerpt(context.settings.max_document_chars)
        ));
        (system, prompt)
    }

    /// SDK-style call for direct crew integration.
    ///
    /// The returned `filename` is whatever the model wrote; callers compare
    /// it with the PDF's name before correcting it.
    pub async fn run(
        context: &CrewContext,
        document: &PdfDocument,
    ) -> anyhow::Result<ArticleSummary> {
        let config = context.settings.model_config(agent_ids::READER);
        let (system, prompt) = Self::build_prompts(context, document);

        run_llm_worker!(
            &config,
            ArticleSummary,
            system.as_str(),
            prompt,
            pdf_tools::search_pdf,
        )
    }
}

#[async_trait]
impl SkillHandler for ReaderSkill {
    async fn on_request(
        &self,
        _state: &mut State,
        progress: &ProgressSender,
        _runtime: &dyn AgentRuntime,
        content: Content,
    ) -> AgentResult<OnRequestResult> {
        let path = PathBuf::from(content.first_text().unwrap_or_default().trim());

        progress.send_update("Extracting PDF text...").await?;

        let document = DocumentStore::global()
            .open(&path)
            .await
            .map_err(|e| AgentError::Internal {
                component: "reader_skill".to_string(),
                reason: e.to_string(),
            })?;

        progress.send_update("Reading paper...").await?;

        let mut summary = Self::run(&self.context, &document)
            .await
            .map_err(|e| AgentError::Internal {
                component: "reader_skill".to_string(),
                reason: e.to_string(),
            })?;
        summary.filename = document.file_name.clone();

        progress.send_update("Extraction complete.").await?;

        let artifact = Artifact::from_json("summary.json", &summary).map_err(|e| {
            AgentError::Internal {
                component: "reader_skill".to_string(),
                reason: format!("Failed to create artifact: {}", e),
            }
        })?;

        Ok(OnRequestResult::Completed {
            message: Some(Content::from_text(&format!(
                "Extracted summary for {}",
                summary.filename
            ))),
            artifacts: vec![artifact],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn document() -> PdfDocument {
        PdfDocument::from_text(
            Path::new("/papers/Lee 2024 - Sparse Attention.pdf"),
            "Abstract. Sparse attention cuts memory by 40%.",
        )
    }

    #[test]
    fn test_template_filename_is_filled_in() {
        let context = CrewContext::bundled().unwrap();
        let vars = ReaderSkill::prompt_vars(&context, &document());
        assert!(vars["template"].contains("filename: Lee 2024 - Sparse Attention.pdf"));
    }

    #[test]
    fn test_prompts_carry_instructions_and_excerpt() {
        let context = CrewContext::bundled().unwrap();
        let (system, prompt) = ReaderSkill::build_prompts(&context, &document());

        assert!(system.contains("Scientific Paper Reader"));
        assert!(system.contains("Lee 2024 - Sparse Attention.pdf"));
        assert!(prompt.contains("/papers/Lee 2024 - Sparse Attention.pdf"));
        assert!(prompt.contains("350 words"));
        assert!(prompt.contains("Sparse attention cuts memory by 40%."));
        assert!(prompt.contains("Expected output:"));
        assert!(!prompt.contains("{requests}"));
    }

    #[test]
    fn test_excerpt_respects_budget() {
        let mut context = CrewContext::bundled().unwrap();
        context.settings.max_document_chars = 8;
        let (_, prompt) = ReaderSkill::build_prompts(&context, &document());
        assert!(prompt.contains("(8 of 46 characters)"));
        assert!(prompt.contains("[TRUNCATED]"));
    }
}
