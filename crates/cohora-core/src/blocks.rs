//! Fenced content blocks in generated text
//!
//! Three extractors run over the same text independently:
//!
//! ````text
//! ```FILE_UPDATE: src/app.js      explicit update (also UPDATE_FILE:)
//! ```FILE_CREATE: notes.md        explicit create (also CREATE_FILE:)
//! ```server.js                    implicit, if the tag looks like a filename
//! ```src/server.js                implicit, paths allowed
//! ````
//!
//! Bodies are trimmed. Blocks whose trimmed body is shorter than the
//! configured floor are dropped and reported as skips.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static EXPLICIT_UPDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)```(?:FILE_UPDATE|UPDATE_FILE):[ \t]*([^\r\n]+)\r?\n(?s:(.*?))```")
        .expect("update block pattern is valid")
});

static EXPLICIT_CREATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)```(?:FILE_CREATE|CREATE_FILE):[ \t]*([^\r\n]+)\r?\n(?s:(.*?))```")
        .expect("create block pattern is valid")
});

static EXPLICIT_ANY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)```(?:FILE_UPDATE|UPDATE_FILE|FILE_CREATE|CREATE_FILE):[^\r\n]*\r?\n(?s:.*?)```",
    )
    .expect("directive block pattern is valid")
});

static IMPLICIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```([A-Za-z0-9_./\-]+)\r?\n(?s:(.*?))```").expect("fence pattern is valid")
});

/// Tag fragments that make an extensionless fence tag a filename
const FILENAME_HINTS: &[&str] = &["readme", "package.json", "config", "server", "index", "main"];

/// Where a block came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockSource {
    /// ```` ```name ```` fence
    ImplicitFence,
    /// `FILE_CREATE:` / `CREATE_FILE:` directive
    ExplicitCreate,
    /// `FILE_UPDATE:` / `UPDATE_FILE:` directive
    ExplicitUpdate,
}

impl BlockSource {
    /// Directives skip the write policy
    #[inline]
    #[must_use]
    pub fn is_explicit(self) -> bool {
        !matches!(self, Self::ImplicitFence)
    }
}

/// Filename and body pulled from generated text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Target filename as written in the fence
    pub filename: String,
    /// Trimmed body
    pub content: String,
    /// Extractor that found it
    pub source: BlockSource,
}

/// A block dropped for being too short
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortBlock {
    /// Target filename
    pub filename: String,
    /// Trimmed body length in characters
    pub length: usize,
}

/// Extraction result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBlocks {
    /// Blocks that passed the length floor, in extraction order
    pub blocks: Vec<ContentBlock>,
    /// Blocks that did not
    pub skipped: Vec<ShortBlock>,
}

/// Whether an implicit fence tag names a file
#[must_use]
pub fn is_filename_tag(tag: &str) -> bool {
    let lower = tag.to_ascii_lowercase();
    tag.contains('.') || FILENAME_HINTS.iter().any(|hint| lower.contains(hint))
}

/// Extract every block from `text`
///
/// Order: explicit updates, explicit creates, then implicit fences.
#[must_use]
pub fn parse_blocks(text: &str, min_chars: usize) -> ParsedBlocks {
    let mut found = Vec::new();
    collect(&EXPLICIT_UPDATE, text, BlockSource::ExplicitUpdate, &mut found);
    collect(&EXPLICIT_CREATE, text, BlockSource::ExplicitCreate, &mut found);
    for caps in IMPLICIT.captures_iter(text) {
        let tag = &caps[1];
        if is_filename_tag(tag) {
            found.push(block_from(&caps, BlockSource::ImplicitFence));
        }
    }

    let mut parsed = ParsedBlocks::default();
    for block in found {
        let length = block.content.chars().count();
        if length < min_chars {
            tracing::warn!(
                filename = %block.filename,
                length,
                "block content too short, skipping"
            );
            parsed.skipped.push(ShortBlock {
                filename: block.filename,
                length,
            });
        } else {
            tracing::debug!(filename = %block.filename, source = ?block.source, length, "found block");
            parsed.blocks.push(block);
        }
    }
    parsed
}

fn collect(pattern: &Regex, text: &str, source: BlockSource, out: &mut Vec<ContentBlock>) {
    out.extend(pattern.captures_iter(text).map(|caps| block_from(&caps, source)));
}

fn block_from(caps: &Captures<'_>, source: BlockSource) -> ContentBlock {
    ContentBlock {
        filename: caps[1].trim().to_string(),
        content: caps[2].trim().to_string(),
        source,
    }
}

/// Display form of generated text
///
/// Directive blocks are removed. Implicit fences for files in `persisted`
/// become a one-line marker. Everything else is kept as written.
#[must_use]
pub fn redact(text: &str, persisted: &[String]) -> String {
    let without_directives = EXPLICIT_ANY.replace_all(text, "");
    let marked = IMPLICIT.replace_all(&without_directives, |caps: &Captures<'_>| {
        let tag = &caps[1];
        if persisted.iter().any(|p| p.eq_ignore_ascii_case(tag)) {
            format!("[File content for {tag} processed]")
        } else {
            caps[0].to_string()
        }
    });
    marked.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn implicit_fence() {
        let text = "Here you go:\n```index.js\nconsole.log('hi');\n```\n";
        let parsed = parse_blocks(text, 10);
        assert_eq!(
            parsed.blocks,
            vec![ContentBlock {
                filename: "index.js".into(),
                content: "console.log('hi');".into(),
                source: BlockSource::ImplicitFence,
            }]
        );
    }

    #[test]
    fn implicit_fence_with_directories() {
        let text = "Fixed:\n```src/app.js\nlet a = 1; // fixed it\n```";
        let parsed = parse_blocks(text, 10);
        assert_eq!(parsed.blocks.len(), 1);
        assert_eq!(parsed.blocks[0].filename, "src/app.js");
        assert_eq!(parsed.blocks[0].content, "let a = 1; // fixed it");
        assert_eq!(
            redact(text, &["src/app.js".to_string()]),
            "Fixed:\n[File content for src/app.js processed]"
        );
    }

    #[test]
    fn language_fences_are_ignored() {
        let text = "```javascript\nconsole.log('not a file');\n```";
        assert!(parse_blocks(text, 10).blocks.is_empty());
    }

    #[test]
    fn extensionless_hint_tags_are_files() {
        assert!(is_filename_tag("README"));
        assert!(is_filename_tag("Makefile.am"));
        assert!(is_filename_tag("main"));
        assert!(!is_filename_tag("rust"));
        assert!(!is_filename_tag("bash"));
    }

    #[test]
    fn explicit_directives() {
        let text = "```FILE_UPDATE: src/app.js\nlet a = 1; // updated\n```\n\
                    ```create_file:notes.md\n# Notes for later\n```";
        let parsed = parse_blocks(text, 10);
        let got: Vec<_> = parsed
            .blocks
            .iter()
            .map(|b| (b.filename.as_str(), b.source))
            .collect();
        assert_eq!(
            got,
            vec![
                ("src/app.js", BlockSource::ExplicitUpdate),
                ("notes.md", BlockSource::ExplicitCreate),
            ]
        );
    }

    #[test]
    fn length_floor() {
        let nine = "```index.js\n123456789\n```";
        let ten = "```index.js\n1234567890\n```";

        let parsed = parse_blocks(nine, 10);
        assert!(parsed.blocks.is_empty());
        assert_eq!(
            parsed.skipped,
            vec![ShortBlock {
                filename: "index.js".into(),
                length: 9
            }]
        );

        assert_eq!(parse_blocks(ten, 10).blocks.len(), 1);
    }

    #[test]
    fn floor_counts_trimmed_body() {
        let padded = "```a.txt\n\n   short   \n\n```";
        assert!(parse_blocks(padded, 10).blocks.is_empty());
    }

    #[test]
    fn multiple_blocks_in_order() {
        let text = "```a.txt\nfirst body here\n```\ntext\n```b.txt\nsecond body here\n```";
        let names: Vec<_> = parse_blocks(text, 10)
            .blocks
            .into_iter()
            .map(|b| b.filename)
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn redaction() {
        let text = "Intro\n```FILE_CREATE: x.md\nsecret body\n```\n\
                    ```a.txt\nwritten body\n```\n\
                    ```b.txt\nnot written\n```\n\
                    ```rust\nfn main() {}\n```\n";
        let shown = redact(text, &["a.txt".to_string()]);
        assert!(!shown.contains("secret body"));
        assert!(shown.contains("[File content for a.txt processed]"));
        assert!(shown.contains("```b.txt\nnot written\n```"));
        assert!(shown.contains("```rust\nfn main() {}\n```"));
        assert!(shown.starts_with("Intro"));
    }
}
