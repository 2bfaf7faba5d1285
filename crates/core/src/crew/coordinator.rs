//! # Crew Coordinator
//!
//! Runs every discovered paper through read → review → research → write,
//! one paper at a time, then writes the run's YAML and Markdown files.

use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::article::render_article;
use crate::config::{agent_ids, ArticleMode, CrewContext};
use crate::document::discover_pdfs;
use crate::skills::ResearchOutput;
use crate::summary::{validate, ArticleSummary, SummaryDocument, ValidationReport, Violation};

use super::events::{CrewEvent, CrewEventKind};
use super::output::{run_timestamp, write_article, write_summaries, ArticleNames};
use super::pipeline::{Pipeline, PipelineStage};
use super::stages::{LlmStages, StageRunner};

const COORDINATOR: &str = "crew";

/// How the reviewer left a paper
#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutcome {
    pub filename: String,
    /// Review passes actually run
    pub passes: u32,
    /// Violations found in the reader's draft
    pub initial: Vec<Violation>,
    /// Violations left after the last pass
    pub remaining: Vec<Violation>,
}

/// A paper that was dropped from the run
#[derive(Debug, Clone, Serialize)]
pub struct PaperFailure {
    pub path: PathBuf,
    pub stage: PipelineStage,
    pub error: String,
}

/// Result of one crew run
#[derive(Debug, Default, Serialize)]
pub struct CrewReport {
    /// Final summaries, in discovery order
    pub summaries: Vec<ArticleSummary>,
    /// `summaries_<timestamp>.yaml`, absent when no paper succeeded
    pub yaml_path: Option<PathBuf>,
    pub articles: Vec<PathBuf>,
    pub failures: Vec<PaperFailure>,
    pub reviews: Vec<ReviewOutcome>,
    pub events: Vec<CrewEvent>,
}

impl CrewReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Papers that still carry violations after review
    pub fn unresolved(&self) -> impl Iterator<Item = &ReviewOutcome> {
        self.reviews.iter().filter(|r| !r.remaining.is_empty())
    }
}

struct PaperOutcome {
    summary: ArticleSummary,
    review: ReviewOutcome,
    article: String,
}

/// The crew coordinator
pub struct Crew<R = LlmStages> {
    context: Arc<CrewContext>,
    runner: R,
    events: Vec<CrewEvent>,
    event_tx: Option<mpsc::Sender<CrewEvent>>,
}

impl Crew<LlmStages> {
    /// Crew backed by the configured models
    pub fn new(context: Arc<CrewContext>) -> Self {
        Self::with_runner(context, LlmStages)
    }
}

impl<R: StageRunner> Crew<R> {
    pub fn with_runner(context: Arc<CrewContext>, runner: R) -> Self {
        Self {
            context,
            runner,
            events: Vec::new(),
            event_tx: None,
        }
    }

    /// Set event channel for streaming events
    pub fn with_event_channel(mut self, tx: mpsc::Sender<CrewEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn context(&self) -> &CrewContext {
        &self.context
    }

    /// Emit an event
    async fn emit(&mut self, event: CrewEvent) {
        self.events.push(event.clone());
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event).await;
        }
    }

    /// Process every PDF found in the configured directory.
    ///
    /// A paper that fails is recorded in the report and the run moves on.
    /// Errors are returned only for discovery and output failures.
    #[tracing::instrument(skip(self), fields(pdf_dir = %self.context.settings.pdf_dir.display()))]
    pub async fn run(&mut self) -> Result<CrewReport> {
        let context = Arc::clone(&self.context);
        let settings = &context.settings;
        self.events.clear();

        let pdfs = discover_pdfs(&settings.pdf_dir, &settings.pattern, settings.recursive)?;
        tracing::info!(count = pdfs.len(), "Discovered PDFs");
        self.emit(
            CrewEvent::new(CrewEventKind::RunStarted, COORDINATOR)
                .with_data(serde_json::json!({ "pdfs": pdfs.len() })),
        )
        .await;

        let timestamp = run_timestamp();
        let mut report = CrewReport::default();
        let mut articles = Vec::new();

        for path in &pdfs {
            let file = file_name(path);
            tracing::info!(file = %file, "Processing paper");

            match self.process(&context, path, &file).await {
                Ok(outcome) => {
                    self.emit(
                        CrewEvent::new(CrewEventKind::PaperCompleted, COORDINATOR).with_file(&file),
                    )
                    .await;
                    articles.push((file, outcome.article));
                    report.reviews.push(outcome.review);
                    report.summaries.push(outcome.summary);
                }
                Err(failure) => {
                    tracing::warn!(
                        file = %file,
                        stage = ?failure.stage,
                        error = %failure.error,
                        "Skipping paper"
                    );
                    self.emit(
                        CrewEvent::new(CrewEventKind::PaperFailed, COORDINATOR)
                            .with_file(&file)
                            .with_data(serde_json::json!({ "error": failure.error })),
                    )
                    .await;
                    report.failures.push(failure);
                }
            }
        }

        if report.summaries.is_empty() {
            tracing::warn!("No paper produced a summary; nothing written");
        } else {
            let document = SummaryDocument::new(report.summaries.clone());
            let path = write_summaries(&settings.yaml_dir(), &document, &timestamp).await?;
            self.emit(
                CrewEvent::new(CrewEventKind::OutputWritten, COORDINATOR)
                    .with_data(serde_json::json!({ "path": path })),
            )
            .await;
            report.yaml_path = Some(path);
        }

        let articles_dir = settings.articles_dir();
        let mut names = ArticleNames::new(&timestamp);
        for (file, markdown) in articles {
            let path = write_article(&articles_dir, &file, &markdown, &mut names).await?;
            self.emit(
                CrewEvent::new(CrewEventKind::OutputWritten, COORDINATOR)
                    .with_file(&file)
                    .with_data(serde_json::json!({ "path": path })),
            )
            .await;
            report.articles.push(path);
        }

        self.emit(
            CrewEvent::new(CrewEventKind::RunCompleted, COORDINATOR).with_data(serde_json::json!({
                "succeeded": report.summaries.len(),
                "failed": report.failures.len(),
            })),
        )
        .await;
        tracing::info!(
            succeeded = report.summaries.len(),
            failed = report.failures.len(),
            "Run complete"
        );

        report.events = std::mem::take(&mut self.events);
        Ok(report)
    }

    async fn process(
        &mut self,
        context: &CrewContext,
        path: &Path,
        file: &str,
    ) -> std::result::Result<PaperOutcome, PaperFailure> {
        let settings = &context.settings;
        let rules = &settings.validation;
        let research_enabled =
            settings.research_enabled && settings.article_mode == ArticleMode::Llm;
        let mut pipeline = Pipeline::new(settings.max_review_passes, research_enabled);

        // Stage 1: Read
        self.emit(CrewEvent::new(CrewEventKind::AgentStarted, agent_ids::READER).with_file(file))
            .await;
        let mut summary = match self.runner.read(context, path).await {
            Ok(summary) => summary,
            Err(e) => return Err(self.fail(&mut pipeline, agent_ids::READER, path, e).await),
        };
        let mut report = check(&summary, file, rules);
        summary.filename = file.to_string();
        let initial = report.violations.clone();
        self.emit(
            CrewEvent::new(CrewEventKind::AgentCompleted, agent_ids::READER)
                .with_file(file)
                .with_data(serde_json::json!({ "violations": initial.len() })),
        )
        .await;
        pipeline.advance();

        // Stage 2: Review, repeated while violations remain and passes are left
        let mut passes = 0;
        while pipeline.stage == PipelineStage::Reviewing {
            self.emit(
                CrewEvent::new(CrewEventKind::AgentStarted, agent_ids::REVIEWER)
                    .with_file(file)
                    .with_data(serde_json::json!({ "pass": passes + 1 })),
            )
            .await;
            let reviewed = match self.runner.review(context, &summary, &report.violations).await {
                Ok(reviewed) => reviewed,
                Err(e) => return Err(self.fail(&mut pipeline, agent_ids::REVIEWER, path, e).await),
            };
            passes += 1;
            report = check(&reviewed, file, rules);
            summary = reviewed;
            summary.filename = file.to_string();
            self.emit(
                CrewEvent::new(CrewEventKind::AgentCompleted, agent_ids::REVIEWER)
                    .with_file(file)
                    .with_data(serde_json::json!({ "violations": report.violations.len() })),
            )
            .await;

            if report.is_valid() || !pipeline.reject() {
                pipeline.advance();
            } else {
                self.emit(
                    CrewEvent::new(CrewEventKind::ReviewRejected, agent_ids::REVIEWER)
                        .with_file(file),
                )
                .await;
            }
        }
        if !report.is_valid() {
            tracing::warn!(
                file = %file,
                violations = %report.to_bullets(),
                "Summary still has violations"
            );
            self.emit(
                CrewEvent::new(CrewEventKind::ViolationsRemaining, agent_ids::REVIEWER)
                    .with_file(file)
                    .with_data(serde_json::json!({ "violations": report.violations })),
            )
            .await;
        }

        // Stage 3: Research (optional, failure degrades to no notes)
        let mut research: Option<ResearchOutput> = None;
        if pipeline.stage == PipelineStage::Researching {
            self.emit(
                CrewEvent::new(CrewEventKind::AgentStarted, agent_ids::RESEARCHER).with_file(file),
            )
            .await;
            match self.runner.research(context, &summary).await {
                Ok(output) => {
                    self.emit(
                        CrewEvent::new(CrewEventKind::AgentCompleted, agent_ids::RESEARCHER)
                            .with_file(file)
                            .with_data(serde_json::json!({ "links": output.links.len() })),
                    )
                    .await;
                    research = Some(output);
                }
                Err(e) => {
                    tracing::warn!(
                        file = %file,
                        error = %format!("{:#}", e),
                        "Research failed; writing without notes"
                    );
                    self.emit(
                        CrewEvent::new(CrewEventKind::ResearchSkipped, agent_ids::RESEARCHER)
                            .with_file(file)
                            .with_data(serde_json::json!({ "error": format!("{:#}", e) })),
                    )
                    .await;
                }
            }
            pipeline.advance();
        }

        // Stage 4: Write
        let article = match settings.article_mode {
            ArticleMode::Template => {
                render_article(&summary, &context.prompts.tasks.write_article.article)
            }
            ArticleMode::Llm => {
                self.emit(
                    CrewEvent::new(CrewEventKind::AgentStarted, agent_ids::WRITER).with_file(file),
                )
                .await;
                let draft = match self.runner.write(context, &summary, research.as_ref()).await {
                    Ok(draft) => draft,
                    Err(e) => {
                        return Err(self.fail(&mut pipeline, agent_ids::WRITER, path, e).await)
                    }
                };
                self.emit(
                    CrewEvent::new(CrewEventKind::AgentCompleted, agent_ids::WRITER)
                        .with_file(file)
                        .with_data(serde_json::json!({ "title": draft.title })),
                )
                .await;
                draft.markdown
            }
        };
        pipeline.advance();
        debug_assert!(pipeline.is_success());

        Ok(PaperOutcome {
            review: ReviewOutcome {
                filename: file.to_string(),
                passes,
                initial,
                remaining: report.violations,
            },
            summary,
            article,
        })
    }

    async fn fail(
        &mut self,
        pipeline: &mut Pipeline,
        agent: &str,
        path: &Path,
        error: anyhow::Error,
    ) -> PaperFailure {
        let stage = pipeline.stage;
        pipeline.fail();
        let error = format!("{:#}", error);
        self.emit(
            CrewEvent::new(CrewEventKind::AgentFailed, agent)
                .with_file(&file_name(path))
                .with_data(serde_json::json!({ "error": error })),
        )
        .await;
        PaperFailure {
            path: path.to_path_buf(),
            stage,
            error,
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn check(
    summary: &ArticleSummary,
    file: &str,
    rules: &crate::summary::ValidationRules,
) -> ValidationReport {
    let mut report = validate(summary, rules);
    report.check_filename(summary, file);
    report
}
