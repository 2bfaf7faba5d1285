//! # Crew Events
//!
//! Progress events emitted while the crew works through the papers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Kind of crew event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CrewEventKind {
    /// Run started (data: discovered file count)
    RunStarted,
    /// Agent started working on a paper
    AgentStarted,
    /// Agent completed successfully
    AgentCompleted,
    /// Agent failed
    AgentFailed,
    /// Review left violations and another pass follows
    ReviewRejected,
    /// Violations remain after the last review pass
    ViolationsRemaining,
    /// Research stage skipped or degraded
    ResearchSkipped,
    /// Paper finished
    PaperCompleted,
    /// Paper dropped after a failure
    PaperFailed,
    /// A YAML or Markdown file was written
    OutputWritten,
    /// Run completed
    RunCompleted,
}

/// An event in the crew run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewEvent {
    /// Unique event ID
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub kind: CrewEventKind,
    /// Agent that produced this event
    pub agent: String,
    /// Paper file name, when the event concerns one paper
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl CrewEvent {
    pub fn new(kind: CrewEventKind, agent: &str) -> Self {
        Self {
            id: next_event_id(),
            timestamp: Utc::now(),
            kind,
            agent: agent.to_string(),
            file: None,
            data: None,
        }
    }

    pub fn with_file(mut self, file: &str) -> Self {
        self.file = Some(file.to_string());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// One-line rendering for terminals and logs
    pub fn describe(&self) -> String {
        let mut line = format!("[{}] {:?}", self.agent, self.kind);
        if let Some(file) = &self.file {
            line.push_str(&format!(" {}", file));
        }
        if let Some(data) = &self.data {
            line.push_str(&format!(" {}", data));
        }
        line
    }
}

/// Process-unique id: millisecond timestamp plus a sequence number
fn next_event_id() -> String {
    static SEQUENCE: AtomicU64 = AtomicU64::new(0);
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{:x}-{:04x}", Utc::now().timestamp_millis(), seq)
}
