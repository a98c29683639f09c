//! Generator prompt assembly

use crate::context::{ContextEntry, Exchange};
use crate::types::ActionSet;
use std::fmt::Write as _;

const AGENT_INSTRUCTIONS: &str = "\
You are an assistant with access to the files in the user's working directory. \
Answer general questions normally.

When the user wants a file created or edited, reply with the complete file \
content in a fenced block tagged with the filename:
```filename.ext
[complete file content]
```

- Always give the entire file; never truncate or summarize it.
- When editing, start from the current content shown below.
- If the user wants a file deleted, ask them to confirm.
- Only modify files when asked to create, edit, or update them. Never modify \
files the user only wants to read.";

const TRUNCATION_MARKER: &str = "...[truncated]";

/// Everything a turn prompt is built from
#[derive(Debug, Clone, Copy)]
pub struct PromptParts<'a> {
    /// Actions detected this turn
    pub actions: &'a ActionSet,
    /// Working directory, for display
    pub working_dir: &'a str,
    /// Non-directory entries in the working directory
    pub available_files: &'a [String],
    /// Files held in context, oldest first
    pub context: &'a [&'a ContextEntry],
    /// Recent exchanges, oldest first
    pub history: &'a [&'a Exchange],
    /// Characters of each context file to include
    pub preview_chars: usize,
    /// The user's line
    pub request: &'a str,
}

/// Truncate to `limit` characters, appending the marker when cut
#[must_use]
pub fn preview(content: &str, limit: usize) -> String {
    match content.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &content[..cut]),
        None => content.to_string(),
    }
}

/// Build the prompt for one turn
#[must_use]
pub fn build_turn_prompt(parts: &PromptParts<'_>) -> String {
    let mut out = String::with_capacity(2048);
    let _ = writeln!(out, "{AGENT_INSTRUCTIONS}");
    let _ = writeln!(out, "\nDETECTED ACTION: {}", parts.actions);
    let _ = writeln!(out, "WORKING DIRECTORY: {}", parts.working_dir);

    out.push_str("\nAvailable files in current directory:\n");
    if parts.available_files.is_empty() {
        out.push_str("No files found\n");
    } else {
        let _ = writeln!(out, "{}", parts.available_files.join(", "));
    }

    out.push_str("\nFiles currently loaded in context:");
    if parts.context.is_empty() {
        out.push_str("\nNo files currently loaded.\n");
    } else {
        for entry in parts.context {
            let _ = write!(
                out,
                "\n\n{}:\n```\n{}\n```",
                entry.filename,
                preview(&entry.content, parts.preview_chars)
            );
        }
        out.push('\n');
    }

    if !parts.history.is_empty() {
        out.push_str("\nRecent conversation history:");
        for exchange in parts.history {
            let _ = write!(
                out,
                "\nUser: {}\nAssistant: {}",
                exchange.user_text, exchange.generated_text
            );
        }
        out.push('\n');
    }

    let _ = write!(out, "\nUser request: {}", parts.request);
    out
}

/// Guided generation task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Restructure an existing file
    Refactor,
    /// Find and fix defects in an existing file
    Debug,
    /// Produce new code of a named kind
    Generate,
}

impl TaskKind {
    /// Whether the task targets an existing file
    #[inline]
    #[must_use]
    pub fn needs_target(self) -> bool {
        matches!(self, Self::Refactor | Self::Debug)
    }
}

/// Build the prompt for a guided task
///
/// `content` is the target's current text; only [`TaskKind::Debug`] embeds it.
#[must_use]
pub fn build_task_prompt(
    kind: TaskKind,
    target: &str,
    instructions: Option<&str>,
    content: Option<&str>,
) -> String {
    match kind {
        TaskKind::Refactor => format!(
            "You are an expert code refactoring assistant.\n\n\
             TARGET: {target}\n\
             INSTRUCTIONS: {}\n\n\
             Refactor the code to improve its structure and readability while keeping its \
             behavior. Comment the major changes.\n\n\
             Respond with the complete refactored file in a fenced block:\n\
             ```{target}\n[refactored code]\n```",
            instructions.unwrap_or("Improve code quality, readability, and maintainability"),
        ),
        TaskKind::Debug => format!(
            "You are an expert debugging assistant.\n\n\
             TARGET FILE: {target}\n\
             CONTENT:\n```\n{}\n```\n\n\
             Identify bugs, error-prone patterns, performance problems, and security issues.\n\n\
             Respond with the corrected file in a fenced block:\n\
             ```{target}\n[corrected code with comments]\n```",
            content.unwrap_or_default(),
        ),
        TaskKind::Generate => format!(
            "You are an expert code generation assistant.\n\n\
             GENERATE: {target}\n\
             SPECIFICATIONS: {}\n\n\
             Produce complete, documented code with proper error handling.\n\n\
             Respond with each file in a fenced block tagged with its filename:\n\
             ```filename.ext\n[generated code]\n```",
            instructions.unwrap_or("Follow best practices and current standards"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileAction;

    #[test]
    fn preview_truncates_on_chars() {
        assert_eq!(preview("abc", 5), "abc");
        assert_eq!(preview("abcdef", 3), "abc...[truncated]");
        assert_eq!(preview("ééé", 2), "éé...[truncated]");
        assert_eq!(preview("exact", 5), "exact");
    }

    #[test]
    fn turn_prompt_sections() {
        let actions: ActionSet = [FileAction::Create].into_iter().collect();
        let entry = ContextEntry::new("a.txt", "x".repeat(600));
        let exchange = Exchange {
            user_text: "hi".into(),
            generated_text: "hello".into(),
        };
        let files = vec!["a.txt".to_string(), "b.md".to_string()];
        let prompt = build_turn_prompt(&PromptParts {
            actions: &actions,
            working_dir: "/work",
            available_files: &files,
            context: &[&entry],
            history: &[&exchange],
            preview_chars: 500,
            request: "create readme",
        });

        assert!(prompt.contains("DETECTED ACTION: create"));
        assert!(prompt.contains("WORKING DIRECTORY: /work"));
        assert!(prompt.contains("a.txt, b.md"));
        assert!(prompt.contains(&format!("a.txt:\n```\n{}...[truncated]", "x".repeat(500))));
        assert!(prompt.contains("User: hi\nAssistant: hello"));
        assert!(prompt.ends_with("User request: create readme"));
    }

    #[test]
    fn empty_sections() {
        let actions = ActionSet::new();
        let prompt = build_turn_prompt(&PromptParts {
            actions: &actions,
            working_dir: ".",
            available_files: &[],
            context: &[],
            history: &[],
            preview_chars: 500,
            request: "hello",
        });
        assert!(prompt.contains("DETECTED ACTION: none detected"));
        assert!(prompt.contains("No files found"));
        assert!(prompt.contains("No files currently loaded."));
        assert!(!prompt.contains("Recent conversation history"));
    }

    #[test]
    fn debug_prompt_embeds_content() {
        let prompt = build_task_prompt(TaskKind::Debug, "app.js", None, Some("let x = ;"));
        assert!(prompt.contains("CONTENT:\n```\nlet x = ;\n```"));
        assert!(prompt.contains("```app.js\n"));
    }

    #[test]
    fn refactor_default_instructions() {
        let prompt = build_task_prompt(TaskKind::Refactor, "app.js", None, None);
        assert!(prompt.contains("INSTRUCTIONS: Improve code quality"));
        assert!(TaskKind::Refactor.needs_target());
        assert!(!TaskKind::Generate.needs_target());
    }
}
