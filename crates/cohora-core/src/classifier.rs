//! Intent classification
//!
//! Free text is run through an ordered table of [`Rule`]s. Every rule is
//! evaluated, and every match is accumulated into a [`Classification`], so
//! later groups still contribute filenames and action tags even when an
//! earlier group decides how the turn is dispatched.
//!
//! Group precedence, highest first:
//! 1. [`RuleGroup::List`] - "show me all files"
//! 2. [`RuleGroup::Read`] - "what's in notes.txt"
//! 3. [`RuleGroup::Delete`] - "delete the readme"
//! 4. [`RuleGroup::CreateEdit`] - "create a new config", "fix server.js"
//! 5. [`RuleGroup::Mention`] - any literal well-known filename

use crate::normalize::{normalize_filename, same_file, well_known};
use crate::types::{ActionSet, FileAction};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Extensioned filename, optionally with directories
const FILE: &str = r"[A-Za-z0-9_./\-]+\.[A-Za-z]+";

/// Closed list of bare nouns accepted after create/edit verbs
const BARE: &str = r"readme|package\.json|config|server|index|main|docs?";

const CREATE_VERBS: &str = r"create|crreade|make|generate";
const EDIT_VERBS: &str = r"edit|update|modify|change|fix|improve|rewrite|debug|add\s+to";

/// Words after a delete verb that never name a file
const DELETE_STOPWORDS: &[&str] = &[
    "a", "all", "an", "any", "anything", "every", "everything", "file", "files", "it", "its",
    "my", "nothing", "some", "something", "that", "them", "these", "this", "those", "what",
];

/// Whether a change creates or modifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// New file
    Create,
    /// Existing file
    Edit,
}

impl From<ChangeKind> for FileAction {
    fn from(kind: ChangeKind) -> Self {
        match kind {
            ChangeKind::Create => FileAction::Create,
            ChangeKind::Edit => FileAction::Edit,
        }
    }
}

/// Classified purpose of one input line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    /// List the working directory
    List,
    /// Show one file
    Read {
        /// Target file
        filename: String,
    },
    /// Remove one file (needs confirmation)
    Delete {
        /// Target file
        filename: String,
    },
    /// Produce new content for a file
    CreateOrEdit {
        /// Target file
        filename: String,
        /// Creation-like or modification-like verb
        action: ChangeKind,
    },
    /// Nothing recognized
    None,
}

impl Intent {
    /// Target filename, if the intent has one
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::Read { filename }
            | Self::Delete { filename }
            | Self::CreateOrEdit { filename, .. } => Some(filename),
            Self::List | Self::None => None,
        }
    }
}

/// Pattern group a rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RuleGroup {
    /// Directory listing
    List,
    /// Read-only file view
    Read,
    /// Destructive removal
    Delete,
    /// Create and edit verbs
    CreateEdit,
    /// Bare well-known filename
    Mention,
}

/// One classification rule: a pattern and what each match emits
pub struct Rule {
    /// Group, for precedence
    pub group: RuleGroup,
    /// Compiled pattern
    pub pattern: Regex,
    /// Builds an intent from a match; `None` discards the match
    pub emit: fn(&str, &Captures<'_>) -> Option<Intent>,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("group", &self.group)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

fn rule(
    group: RuleGroup,
    pattern: &str,
    emit: fn(&str, &Captures<'_>) -> Option<Intent>,
) -> Rule {
    Rule {
        group,
        pattern: Regex::new(&format!("(?i){pattern}")).expect("classifier pattern is valid"),
        emit,
    }
}

/// The rule table, in evaluation order
pub static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        // List
        rule(
            RuleGroup::List,
            r"\b(?:show|list|display)\s+(?:me\s+)?(?:all\s+)?(?:the\s+)?files\b",
            emit_list,
        ),
        rule(
            RuleGroup::List,
            r"\bwhat\s+files\s+are\s+(?:here|available|in\s+this\s+(?:folder|directory))",
            emit_list,
        ),
        rule(RuleGroup::List, r"\b(?:current|available)\s+files\b", emit_list),
        rule(
            RuleGroup::List,
            r"\bfiles\s+in\s+(?:this\s+)?(?:folder|directory)\b",
            emit_list,
        ),
        // Read
        rule(
            RuleGroup::Read,
            &format!(
                r"\b(?:show|display)\s+(?:me\s+)?(?:the\s+)?contents?\s+of\s+(?:the\s+)?({FILE})"
            ),
            emit_read,
        ),
        rule(
            RuleGroup::Read,
            &format!(r"\b(?:read|view|see)\s+(?:the\s+)?({FILE})"),
            emit_read,
        ),
        rule(
            RuleGroup::Read,
            &format!(r"\bwhat(?:'s|\s+is)\s+in\s+(?:the\s+)?({FILE})"),
            emit_read,
        ),
        // Delete
        rule(
            RuleGroup::Delete,
            &format!(r"\b(?:delete|remove|rm)\s+(?:the\s+)?(?:file\s+)?({FILE})"),
            emit_delete,
        ),
        rule(
            RuleGroup::Delete,
            r"\b(?:delete|remove|rm)\s+(?:the\s+)?(?:file\s+)?([A-Za-z0-9_./\-]+)",
            emit_delete_bare,
        ),
        // Create / edit
        rule(
            RuleGroup::CreateEdit,
            &format!(
                r"\b(?:{CREATE_VERBS}|new)\s+(?:a\s+)?(?:new\s+)?(?:file\s+)?(?:called\s+|named\s+)?({FILE})"
            ),
            emit_create,
        ),
        rule(
            RuleGroup::CreateEdit,
            &format!(r"\b(?:{CREATE_VERBS})\s+(?:a\s+)?(?:new\s+)?(?:the\s+)?({BARE})\b"),
            emit_create_bare,
        ),
        rule(
            RuleGroup::CreateEdit,
            &format!(r"\b(?:{EDIT_VERBS})\s+(?:the\s+)?(?:file\s+)?({FILE})"),
            emit_edit,
        ),
        rule(
            RuleGroup::CreateEdit,
            &format!(r"\b(?:{EDIT_VERBS})\s+(?:the\s+)?(?:file\s+)?({BARE})\b"),
            emit_edit_bare,
        ),
        // Mention
        rule(
            RuleGroup::Mention,
            r"\b(server\.js|index\.js|package\.json|readme\.md|config\.json)\b",
            emit_mention,
        ),
    ]
});

fn emit_list(_: &str, _: &Captures<'_>) -> Option<Intent> {
    Some(Intent::List)
}

fn emit_read(_: &str, caps: &Captures<'_>) -> Option<Intent> {
    captured(caps).map(|filename| Intent::Read { filename })
}

fn emit_delete(_: &str, caps: &Captures<'_>) -> Option<Intent> {
    captured(caps).map(|filename| Intent::Delete { filename })
}

fn emit_delete_bare(_: &str, caps: &Captures<'_>) -> Option<Intent> {
    let token = captured(caps)?;
    let lower = token.to_ascii_lowercase();
    if token.starts_with('-') || DELETE_STOPWORDS.contains(&lower.as_str()) {
        return None;
    }
    Some(Intent::Delete {
        filename: normalize_filename(&token),
    })
}

fn emit_create(_: &str, caps: &Captures<'_>) -> Option<Intent> {
    change(caps, ChangeKind::Create)
}

fn emit_create_bare(text: &str, caps: &Captures<'_>) -> Option<Intent> {
    bare_change(text, caps, ChangeKind::Create)
}

fn emit_edit(_: &str, caps: &Captures<'_>) -> Option<Intent> {
    change(caps, ChangeKind::Edit)
}

fn emit_edit_bare(text: &str, caps: &Captures<'_>) -> Option<Intent> {
    bare_change(text, caps, ChangeKind::Edit)
}

fn emit_mention(_: &str, caps: &Captures<'_>) -> Option<Intent> {
    let name = caps.get(1)?.as_str();
    Some(Intent::CreateOrEdit {
        filename: well_known(name).unwrap_or(name).to_string(),
        action: ChangeKind::Edit,
    })
}

fn change(caps: &Captures<'_>, action: ChangeKind) -> Option<Intent> {
    captured(caps).map(|filename| Intent::CreateOrEdit { filename, action })
}

/// A bare noun directly followed by an extension belongs to the
/// extensioned rule ("index.html" is not "index").
fn bare_change(text: &str, caps: &Captures<'_>, action: ChangeKind) -> Option<Intent> {
    let m = caps.get(1)?;
    let mut rest = text[m.end()..].chars();
    if rest.next() == Some('.') && rest.next().is_some_and(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(Intent::CreateOrEdit {
        filename: normalize_filename(m.as_str()),
        action,
    })
}

fn captured(caps: &Captures<'_>) -> Option<String> {
    let raw = caps.get(1)?.as_str();
    let cleaned = raw.trim_end_matches(['.', ',', '/']);
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// Everything the rule table found in one input line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Intents in rule order, duplicates removed
    pub intents: Vec<Intent>,
    /// Detected filenames, case-insensitively unique, first spelling kept
    pub files: Vec<String>,
    /// Union of action tags
    pub actions: ActionSet,
    /// Highest-precedence group with at least one match
    pub group: Option<RuleGroup>,
}

impl Classification {
    /// Highest-precedence intent, or [`Intent::None`]
    #[must_use]
    pub fn primary(&self) -> &Intent {
        self.intents.first().unwrap_or(&Intent::None)
    }

    /// Intent answered without the generator, when the winning group is
    /// list or read
    #[must_use]
    pub fn short_circuit(&self) -> Option<&Intent> {
        match self.group? {
            RuleGroup::List => self.intents.iter().find(|i| matches!(i, Intent::List)),
            RuleGroup::Read => self
                .intents
                .iter()
                .find(|i| matches!(i, Intent::Read { .. })),
            RuleGroup::Delete | RuleGroup::CreateEdit | RuleGroup::Mention => None,
        }
    }

    /// Delete targets in match order, case-insensitively unique
    #[must_use]
    pub fn delete_targets(&self) -> Vec<&str> {
        let mut targets: Vec<&str> = Vec::new();
        for intent in &self.intents {
            if let Intent::Delete { filename } = intent {
                if !targets.iter().any(|t| same_file(t, filename)) {
                    targets.push(filename);
                }
            }
        }
        targets
    }

    /// Whether `name` was detected in the request
    #[must_use]
    pub fn is_mentioned(&self, name: &str) -> bool {
        self.files.iter().any(|f| same_file(f, name))
    }

    fn push(&mut self, intent: Intent) {
        match &intent {
            Intent::Delete { filename } => {
                self.actions.insert(FileAction::Delete);
                self.add_file(filename);
            }
            Intent::CreateOrEdit { filename, action } => {
                self.actions.insert((*action).into());
                self.add_file(filename);
            }
            Intent::Read { filename } => self.add_file(filename),
            Intent::List | Intent::None => {}
        }
        if !self.intents.contains(&intent) {
            self.intents.push(intent);
        }
    }

    fn add_file(&mut self, name: &str) {
        if !self.is_mentioned(name) {
            self.files.push(name.to_string());
        }
    }
}

/// Classify one line of free text
#[must_use]
pub fn classify(text: &str) -> Classification {
    let mut out = Classification::default();
    for rule in RULES.iter() {
        for caps in rule.pattern.captures_iter(text) {
            if let Some(intent) = (rule.emit)(text, &caps) {
                out.group = Some(out.group.map_or(rule.group, |g| g.min(rule.group)));
                out.push(intent);
            }
        }
    }
    tracing::debug!(
        intent = ?out.primary(),
        group = ?out.group,
        files = ?out.files,
        actions = %out.actions,
        "classified input"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn create(name: &str) -> Intent {
        Intent::CreateOrEdit {
            filename: name.to_string(),
            action: ChangeKind::Create,
        }
    }

    fn edit(name: &str) -> Intent {
        Intent::CreateOrEdit {
            filename: name.to_string(),
            action: ChangeKind::Edit,
        }
    }

    #[test]
    fn list_phrases() {
        for text in [
            "show me all files",
            "list files",
            "Display the files please",
            "what files are here?",
            "what files are in this directory",
            "which are the current files",
            "files in this folder",
        ] {
            let c = classify(text);
            assert_eq!(c.primary(), &Intent::List, "{text}");
            assert_eq!(c.short_circuit(), Some(&Intent::List), "{text}");
        }
    }

    #[test]
    fn read_phrases() {
        for text in [
            "show me the contents of notes.txt",
            "read notes.txt",
            "view the notes.txt",
            "what's in notes.txt",
            "what is in the notes.txt?",
        ] {
            let c = classify(text);
            assert_eq!(
                c.short_circuit(),
                Some(&Intent::Read {
                    filename: "notes.txt".into()
                }),
                "{text}"
            );
        }
    }

    #[test]
    fn delete_with_extension() {
        let c = classify("delete notes.txt");
        assert_eq!(c.delete_targets(), vec!["notes.txt"]);
        assert!(c.actions.contains(FileAction::Delete));
        assert_eq!(c.short_circuit(), None);
    }

    #[test]
    fn delete_bare_token_is_normalized() {
        let c = classify("please remove the readme");
        assert_eq!(c.delete_targets(), vec!["README.md"]);
    }

    #[test]
    fn delete_ignores_stopwords_and_flags() {
        assert!(classify("delete it").delete_targets().is_empty());
        assert!(classify("rm -rf").delete_targets().is_empty());
        assert!(classify("don't delete anything").delete_targets().is_empty());
    }

    #[test]
    fn verbs_need_word_boundaries() {
        let c = classify("inform notes.txt owners");
        assert!(c.delete_targets().is_empty());
        assert!(c.actions.is_empty());
    }

    #[test]
    fn create_bare_nouns() {
        assert_eq!(classify("create readme file").primary(), &create("README.md"));
        assert_eq!(classify("crreade a new config").primary(), &create("config.json"));
        assert_eq!(classify("make a server").primary(), &create("server.js"));
        assert_eq!(classify("generate docs").primary(), &create("docs"));
    }

    #[test]
    fn create_extensioned_name() {
        let c = classify("make a new file called app/main.rs");
        assert_eq!(c.primary(), &create("app/main.rs"));
        assert_eq!(c.files, vec!["app/main.rs".to_string()]);
    }

    #[test]
    fn bare_noun_yields_to_extension() {
        let c = classify("create index.html");
        assert_eq!(c.files, vec!["index.html".to_string()]);
    }

    #[test]
    fn edit_verbs() {
        assert_eq!(classify("fix app.py").primary(), &edit("app.py"));
        assert_eq!(classify("please add to notes.md").primary(), &edit("notes.md"));
        assert_eq!(classify("debug the server").primary(), &edit("server.js"));
    }

    #[test]
    fn direct_mention_tags_edit() {
        let c = classify("my server.js keeps crashing");
        assert_eq!(c.primary(), &edit("server.js"));
        assert!(c.actions.contains(FileAction::Edit));
    }

    #[test]
    fn mention_uses_canonical_casing() {
        let c = classify("is readme.md up to date");
        assert_eq!(c.files, vec!["README.md".to_string()]);
    }

    #[test]
    fn duplicates_merge_and_actions_union() {
        let c = classify("create README.md and update readme.md");
        assert_eq!(c.files, vec!["README.md".to_string()]);
        assert!(c.actions.contains(FileAction::Create));
        assert!(c.actions.contains(FileAction::Edit));
        assert_eq!(c.actions.to_string(), "create, edit");
    }

    #[test]
    fn list_outranks_later_groups() {
        let c = classify("list files then edit app.js");
        assert_eq!(c.short_circuit(), Some(&Intent::List));
        assert!(c.is_mentioned("APP.JS"));
    }

    #[test]
    fn earliest_group_decides_dispatch() {
        let c = classify("delete old.txt and show me the contents of notes.txt");
        assert_eq!(c.group, Some(RuleGroup::Read));
        assert_eq!(
            c.short_circuit(),
            Some(&Intent::Read {
                filename: "notes.txt".into()
            })
        );

        let c = classify("delete old.txt");
        assert_eq!(c.group, Some(RuleGroup::Delete));
        assert_eq!(c.short_circuit(), None);

        let c = classify("update index.js");
        assert_eq!(c.group, Some(RuleGroup::CreateEdit));
        assert_eq!(classify("hello there").group, None);
    }

    #[test]
    fn plain_chat_is_none() {
        let c = classify("what is the capital of Pakistan?");
        assert_eq!(c.primary(), &Intent::None);
        assert!(c.files.is_empty());
        assert!(c.actions.is_empty());
    }

    #[test]
    fn traversal_names_are_captured_not_hidden() {
        let c = classify("delete ../secret.txt");
        assert_eq!(c.delete_targets(), vec!["../secret.txt"]);
    }

    proptest! {
        #[test]
        fn files_are_case_insensitively_unique(text in "[a-zA-Z .]{0,80}") {
            let c = classify(&text);
            for (i, a) in c.files.iter().enumerate() {
                for b in &c.files[i + 1..] {
                    prop_assert!(!a.eq_ignore_ascii_case(b));
                }
            }
        }
    }
}
