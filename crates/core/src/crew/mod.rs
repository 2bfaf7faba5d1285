//! # Crew Orchestration
//!
//! Sequences the four agents over every paper in the input directory.
//!
//! ## Pipeline Flow
//!
//! ```text
//! PDF → Reader → Reviewer ⟲ → Researcher (optional) → Writer → YAML + Markdown
//! ```

pub mod coordinator;
pub mod events;
pub mod output;
pub mod pipeline;
pub mod stages;

pub use coordinator::{Crew, CrewReport, PaperFailure, ReviewOutcome};
pub use events::{CrewEvent, CrewEventKind};
pub use output::{article_file_name, run_timestamp, write_article, write_summaries, ArticleNames};
pub use pipeline::{Pipeline, PipelineStage};
pub use stages::{LlmStages, StageRunner};
