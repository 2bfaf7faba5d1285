//! # Stage Runner
//!
//! The four agent calls the coordinator sequences. `LlmStages` wires them to
//! the radkit skills; tests substitute a scripted runner.

use crate::config::CrewContext;
use crate::document::DocumentStore;
use crate::skills::{
    ArticleDraft, ReaderSkill, ResearchOutput, ResearcherSkill, ReviewerSkill, WriterSkill,
};
use crate::summary::{ArticleSummary, Violation};
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait StageRunner: Send + Sync {
    /// Extract a summary from the PDF at `path`
    async fn read(&self, context: &CrewContext, path: &Path) -> Result<ArticleSummary>;

    /// Correct a draft given the violations found in it
    async fn review(
        &self,
        context: &CrewContext,
        draft: &ArticleSummary,
        violations: &[Violation],
    ) -> Result<ArticleSummary>;

    async fn research(&self, context: &CrewContext, summary: &ArticleSummary)
        -> Result<ResearchOutput>;

    async fn write(
        &self,
        context: &CrewContext,
        summary: &ArticleSummary,
        research: Option<&ResearchOutput>,
    ) -> Result<ArticleDraft>;
}

/// Model-backed stages
#[derive(Debug, Clone, Copy, Default)]
pub struct LlmStages;

#[async_trait]
impl StageRunner for LlmStages {
    async fn read(&self, context: &CrewContext, path: &Path) -> Result<ArticleSummary> {
        let store = DocumentStore::global();
        let document = store.open(path).await?;
        tracing::debug!(
            file = %document.file_name,
            pages = document.pages.len(),
            chars = document.char_len(),
            "Extracted PDF text"
        );
        let result = ReaderSkill::run(context, &document).await;
        store.remove(path);
        result
    }

    async fn review(
        &self,
        context: &CrewContext,
        draft: &ArticleSummary,
        violations: &[Violation],
    ) -> Result<ArticleSummary> {
        ReviewerSkill::run(context, draft, violations).await
    }

    async fn research(
        &self,
        context: &CrewContext,
        summary: &ArticleSummary,
    ) -> Result<ResearchOutput> {
        ResearcherSkill::run(context, summary).await
    }

    async fn write(
        &self,
        context: &CrewContext,
        summary: &ArticleSummary,
        research: Option<&ResearchOutput>,
    ) -> Result<ArticleDraft> {
        WriterSkill::run(context, summary, research).await
    }
}
