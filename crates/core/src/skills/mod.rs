//! # Crew Skills
//!
//! A2A-native skills and tools for the paper review crew.
//!
//! ## Architecture
//!
//! ```text
//! Agent (A2A server)
//!   └── Skills (#[skill] + SkillHandler)
//!         └── Tools (#[tool] functions)
//! ```
//!
//! ## Pipeline Order
//!
//! - `ReaderSkill` - Extract the summary record from a PDF (tool: `search_pdf`)
//! - `ReviewerSkill` - Correct the record against the template and controls
//! - `ResearcherSkill` - Optional web context (tool: `search_web`)
//! - `WriterSkill` - LinkedIn article in Markdown

pub mod llm_helpers;
pub mod prompts;
pub mod tools;

pub mod reader_skill;
pub mod researcher_skill;
pub mod reviewer_skill;
pub mod writer_skill;

// Agent Definitions (compose skills into agents)
pub mod agent_definitions;

// Re-exports for convenience
pub use reader_skill::ReaderSkill;
pub use researcher_skill::{ResearchLink, ResearchOutput, ResearcherSkill};
pub use reviewer_skill::ReviewerSkill;
pub use writer_skill::{ArticleDraft, WriterSkill};

// Agent factory functions
pub use agent_definitions::{
    create_crew, reader_agent, researcher_agent, reviewer_agent, writer_agent,
};
