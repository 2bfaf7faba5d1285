//! # A2A Agent Definitions
//!
//! Composes the review crew from skills using radkit's Agent::builder().
//! Each agent can run as an A2A server exposing its skill.

use crate::config::CrewContext;
use radkit::agent::{Agent, AgentDefinition};
use std::sync::Arc;

use crate::skills::{ReaderSkill, ResearcherSkill, ReviewerSkill, WriterSkill};

/// The Paper Reader Agent
///
/// First agent. Fills the summary template from the PDF.
pub fn reader_agent(context: Arc<CrewContext>) -> AgentDefinition {
    Agent::builder()
        .with_name("Paper Reader")
        .with_description(
            "Reads scientific PDFs and extracts objectives, gap, methodology, datasets, \
             results, limitations, biases, conclusion, future work and an evaluation.",
        )
        .with_skill(ReaderSkill::new(context))
        .build()
}

/// The Summary Reviewer Agent
pub fn reviewer_agent(context: Arc<CrewContext>) -> AgentDefinition {
    Agent::builder()
        .with_name("Summary Reviewer")
        .with_description(
            "Checks extracted summaries against the template, controls and restrictions \
             and returns a corrected record.",
        )
        .with_skill(ReviewerSkill::new(context))
        .build()
}

/// The Researcher Agent
///
/// Optional stage. Looks for related work and applications on the web.
pub fn researcher_agent(context: Arc<CrewContext>) -> AgentDefinition {
    Agent::builder()
        .with_name("Researcher")
        .with_description(
            "Searches the web for related work, dataset information and real-world \
             applications of a summarised paper.",
        )
        .with_skill(ResearcherSkill::new(context))
        .build()
}

/// The Writer Agent
pub fn writer_agent(context: Arc<CrewContext>) -> AgentDefinition {
    Agent::builder()
        .with_name("Writer")
        .with_description(
            "Turns a reviewed summary and research notes into a LinkedIn article in Markdown.",
        )
        .with_skill(WriterSkill::new(context))
        .build()
}

/// Create the full crew
///
/// Returns agents in pipeline order:
/// 1. Paper Reader → 2. Summary Reviewer → 3. Researcher → 4. Writer
pub fn create_crew(context: Arc<CrewContext>) -> Vec<AgentDefinition> {
    vec![
        reader_agent(context.clone()),
        reviewer_agent(context.clone()),
        researcher_agent(context.clone()),
        writer_agent(context),
    ]
}
