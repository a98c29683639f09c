//! Checklist extraction from generated text

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([\-\*•\x{25CB}\x{25CF}\x{25A0}\x{25A1}\x{2610}\x{2611}\x{2022}])\s*(\[.\])?\s*(.+)$")
        .expect("checklist pattern is valid")
});

/// Item status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Not yet done
    Pending,
    /// Checked off
    Done,
}

/// One marker-prefixed line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Text after the marker and checkbox
    pub text: String,
    /// Done iff the checkbox held an `x`
    pub status: ItemStatus,
}

impl ChecklistItem {
    /// Pending item
    #[must_use]
    pub fn pending(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: ItemStatus::Pending,
        }
    }

    /// Done item
    #[must_use]
    pub fn done(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: ItemStatus::Done,
        }
    }
}

impl fmt::Display for ChecklistItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = match self.status {
            ItemStatus::Done => 'x',
            ItemStatus::Pending => ' ',
        };
        write!(f, "[{mark}] {}", self.text)
    }
}

/// Scan `text` line by line for checklist items
#[must_use]
pub fn extract_checklist(text: &str) -> Vec<ChecklistItem> {
    text.lines()
        .filter_map(|line| {
            let caps = ITEM.captures(line)?;
            let done = caps.get(2).is_some_and(|b| b.as_str().contains('x'));
            let text = caps[3].trim().to_string();
            Some(ChecklistItem {
                text,
                status: if done {
                    ItemStatus::Done
                } else {
                    ItemStatus::Pending
                },
            })
        })
        .collect()
}
