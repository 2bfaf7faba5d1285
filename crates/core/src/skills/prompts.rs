//! Default prompt files bundled at compile time, plus the helpers that turn
//! agent profiles and task specs into the text sent to the model.

use crate::config::{AgentProfile, TaskSpec};
use std::collections::HashMap;

/// Role, goal and backstory of the four agents
pub const AGENTS_YAML: &str = include_str!("defaults/agents.yaml");

/// Task descriptions and expected outputs
pub const TASKS_YAML: &str = include_str!("defaults/tasks.yaml");

/// All default prompt files with their file names
pub fn all_defaults() -> Vec<(&'static str, &'static str)> {
    vec![("agents.yaml", AGENTS_YAML), ("tasks.yaml", TASKS_YAML)]
}

/// Values substituted for `{name}` placeholders
pub type PromptVars = HashMap<&'static str, String>;

/// Replace `{name}` placeholders with values from `vars`.
///
/// Unknown placeholders and lone braces are left as they are.
pub fn interpolate(template: &str, vars: &PromptVars) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if is_placeholder(&after[..close]) => {
                let name = &after[..close];
                match vars.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_placeholder(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// System instructions for an agent
pub fn system_prompt(profile: &AgentProfile, vars: &PromptVars) -> String {
    format!(
        "You are {}.\n\nYour goal: {}\n\nBackground: {}",
        interpolate(profile.role.trim(), vars),
        interpolate(profile.goal.trim(), vars),
        interpolate(profile.backstory.trim(), vars),
    )
}

/// User message for a task: the interpolated description and the expected output
pub fn task_prompt(task: &TaskSpec, vars: &PromptVars) -> String {
    format!(
        "{}\n\nExpected output:\n{}",
        interpolate(task.description.trim(), vars),
        interpolate(task.expected_output.trim(), vars),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> PromptVars {
        let mut vars = PromptVars::new();
        vars.insert("file", "paper.pdf".to_string());
        vars.insert("summary_yaml", "gap: x".to_string());
        vars
    }

    #[test]
    fn test_all_prompts_non_empty() {
        for (name, content) in all_defaults() {
            assert!(content.len() > 50, "Prompt file '{}' seems too short", name);
        }
    }

    #[test]
    fn test_interpolate_known_and_unknown() {
        let out = interpolate("Read {file}; keep {unknown} and {summary_yaml}", &vars());
        assert_eq!(out, "Read paper.pdf; keep {unknown} and gap: x");
    }

    #[test]
    fn test_interpolate_leaves_non_placeholders() {
        let out = interpolate("json {\"a\": 1} and { file } and {", &vars());
        assert_eq!(out, "json {\"a\": 1} and { file } and {");
    }

    #[test]
    fn test_system_prompt_uses_profile() {
        let profile = AgentProfile {
            role: "Reader".to_string(),
            goal: "Summarise {file}".to_string(),
            backstory: "Careful.".to_string(),
        };
        let prompt = system_prompt(&profile, &vars());
        assert!(prompt.starts_with("You are Reader."));
        assert!(prompt.contains("Summarise paper.pdf"));
    }

    #[test]
    fn test_task_prompt_appends_expected_output() {
        let task = TaskSpec {
            description: "Review {file}".to_string(),
            expected_output: "A record".to_string(),
        };
        assert_eq!(
            task_prompt(&task, &vars()),
            "Review paper.pdf\n\nExpected output:\nA record"
        );
    }
}
