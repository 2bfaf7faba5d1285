//! # Configuration
//!
//! Prompt files (`agents.yaml`, `tasks.yaml`) and runtime settings (`config.json`).

pub mod crew;
pub mod settings;

pub use crew::{
    AgentProfile, AgentsFile, ArticleTemplate, CrewPrompts, ReadInputs, ReadTask, TaskSpec,
    TasksFile, WriteTask,
};
pub use settings::{home_dir, ArticleMode, CrewSettings};

/// Agent identifiers used for per-agent model overrides and event attribution
pub mod agent_ids {
    pub const READER: &str = "pdf_reader";
    pub const REVIEWER: &str = "yaml_reviewer";
    pub const RESEARCHER: &str = "researcher";
    pub const WRITER: &str = "writer";

    pub const ALL: [&str; 4] = [READER, REVIEWER, RESEARCHER, WRITER];
}

/// Prompts and settings shared by every skill of a run
#[derive(Debug, Clone)]
pub struct CrewContext {
    pub prompts: CrewPrompts,
    pub settings: CrewSettings,
}

impl CrewContext {
    pub fn new(prompts: CrewPrompts, settings: CrewSettings) -> Self {
        Self { prompts, settings }
    }

    /// Bundled prompts with default settings
    pub fn bundled() -> anyhow::Result<Self> {
        Ok(Self::new(CrewPrompts::bundled()?, CrewSettings::default()))
    }
}
