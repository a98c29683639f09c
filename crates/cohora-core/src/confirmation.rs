//! Confirmation gate for destructive actions
//!
//! Holds at most one [`PendingAction`]. While one is armed, every input line
//! is a reply to it; nothing times out and unrecognized replies keep it armed.

use serde::{Deserialize, Serialize};

/// Kind of action waiting on the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingKind {
    /// Remove a file
    DeleteConfirmation,
}

/// A destructive action awaiting a yes/no
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    /// What will happen
    pub kind: PendingKind,
    /// File it applies to
    pub filename: String,
}

impl PendingAction {
    /// Pending delete of `filename`
    #[inline]
    #[must_use]
    pub fn delete(filename: impl Into<String>) -> Self {
        Self {
            kind: PendingKind::DeleteConfirmation,
            filename: filename.into(),
        }
    }
}

/// Gate state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GateState {
    /// Nothing pending
    #[default]
    Idle,
    /// Waiting for the user to answer
    AwaitingConfirmation(PendingAction),
}

/// How a reply line reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// yes, y, confirm
    Affirmative,
    /// no, n, cancel
    Negative,
    /// Anything else
    Other,
}

impl Reply {
    /// Read a reply; trimmed and case-insensitive
    #[must_use]
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "yes" | "y" | "confirm" => Self::Affirmative,
            "no" | "n" | "cancel" => Self::Negative,
            _ => Self::Other,
        }
    }
}

/// Outcome of feeding a line to the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Gate was idle; the line is ordinary input
    NothingPending,
    /// User agreed; the action should run now
    Confirmed(PendingAction),
    /// User declined; nothing happens
    Cancelled(PendingAction),
    /// Neither yes nor no; the action stays armed
    Unrecognized(PendingAction),
}

/// Single-slot confirmation state machine
#[derive(Debug, Clone, Default)]
pub struct ConfirmationGate {
    state: GateState,
}

impl ConfirmationGate {
    /// Create idle gate
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Pending action, if any
    #[must_use]
    pub fn pending(&self) -> Option<&PendingAction> {
        match &self.state {
            GateState::Idle => None,
            GateState::AwaitingConfirmation(action) => Some(action),
        }
    }

    /// Whether input should be routed to [`resolve`](Self::resolve)
    #[inline]
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.pending().is_some()
    }

    /// Arm for `action`, returning any action it displaced
    pub fn arm(&mut self, action: PendingAction) -> Option<PendingAction> {
        tracing::debug!(filename = %action.filename, "confirmation armed");
        match std::mem::replace(&mut self.state, GateState::AwaitingConfirmation(action)) {
            GateState::Idle => None,
            GateState::AwaitingConfirmation(previous) => Some(previous),
        }
    }

    /// Feed one input line
    pub fn resolve(&mut self, input: &str) -> Resolution {
        match (std::mem::take(&mut self.state), Reply::parse(input)) {
            (GateState::Idle, _) => Resolution::NothingPending,
            (GateState::AwaitingConfirmation(action), Reply::Other) => {
                self.state = GateState::AwaitingConfirmation(action.clone());
                Resolution::Unrecognized(action)
            }
            (GateState::AwaitingConfirmation(action), Reply::Affirmative) => {
                Resolution::Confirmed(action)
            }
            (GateState::AwaitingConfirmation(action), Reply::Negative) => {
                Resolution::Cancelled(action)
            }
        }
    }

    /// Drop any pending action
    pub fn reset(&mut self) -> Option<PendingAction> {
        match std::mem::take(&mut self.state) {
            GateState::Idle => None,
            GateState::AwaitingConfirmation(action) => Some(action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armed(name: &str) -> ConfirmationGate {
        let mut gate = ConfirmationGate::new();
        gate.arm(PendingAction::delete(name));
        gate
    }

    #[test]
    fn idle_passes_input_through() {
        let mut gate = ConfirmationGate::new();
        assert_eq!(gate.resolve("yes"), Resolution::NothingPending);
        assert_eq!(gate.state(), &GateState::Idle);
    }

    #[test]
    fn affirmative_replies_confirm() {
        for reply in ["yes", "Y", "  confirm  ", "YES"] {
            let mut gate = armed("notes.txt");
            assert_eq!(
                gate.resolve(reply),
                Resolution::Confirmed(PendingAction::delete("notes.txt"))
            );
            assert!(!gate.is_armed());
        }
    }

    #[test]
    fn negative_replies_cancel() {
        for reply in ["no", "n", "Cancel"] {
            let mut gate = armed("notes.txt");
            assert_eq!(
                gate.resolve(reply),
                Resolution::Cancelled(PendingAction::delete("notes.txt"))
            );
            assert_eq!(gate.state(), &GateState::Idle);
        }
    }

    #[test]
    fn other_replies_keep_state() {
        let mut gate = armed("notes.txt");
        for reply in ["maybe", "", "yes please", "nope"] {
            assert!(matches!(gate.resolve(reply), Resolution::Unrecognized(_)));
        }
        assert_eq!(
            gate.state(),
            &GateState::AwaitingConfirmation(PendingAction::delete("notes.txt"))
        );
    }

    #[test]
    fn reset_clears() {
        let mut gate = armed("a.txt");
        assert_eq!(gate.reset(), Some(PendingAction::delete("a.txt")));
        assert_eq!(gate.reset(), None);
    }
}
