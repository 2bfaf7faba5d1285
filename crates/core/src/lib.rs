//! # Revisor Core
//!
//! Reads scientific PDFs, extracts a structured summary of each paper with
//! an LLM crew, and turns the summaries into LinkedIn articles.
//!
//! ## Architecture
//!
//! - `config/` - Prompt files (`agents.yaml`, `tasks.yaml`) and runtime settings
//! - `models` - LLM provider configuration
//! - `document/` - PDF discovery, text extraction and passage search
//! - `summary/` - The summary record, YAML I/O and field checks
//! - `skills/` - A2A-native skills (ReaderSkill, ReviewerSkill, ResearcherSkill, WriterSkill)
//! - `crew/` - Per-paper pipeline and run output
//! - `article` - Template articles without a model call
//!
//! ## Usage
//!
//! ```rust,ignore
//! use revisor_core::config::CrewContext;
//! use revisor_core::crew::Crew;
//! use std::sync::Arc;
//!
//! let context = Arc::new(CrewContext::bundled()?);
//! let report = Crew::new(context).run().await?;
//! println!("{:?}", report.yaml_path);
//! ```

pub mod article;
pub mod config;
pub mod crew;
pub mod document;
pub mod error;
pub mod models;
pub mod skills;
pub mod summary;

pub use error::RevisorError;
