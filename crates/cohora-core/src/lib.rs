//! Cohora Core - intent resolution and file-action execution
//!
//! Turns free text into file operations against a working directory:
//!
//! - [`classifier`]: ordered pattern rules mapping text to [`Intent`]s
//! - [`confirmation`]: single-slot yes/no gate for deletes
//! - [`context`]: bounded file and exchange memory
//! - [`blocks`]: fenced content blocks in generated text
//! - [`policy`]: which implicit blocks may be written
//! - [`session`]: the orchestrator tying them together
//!
//! # Example
//!
//! ```rust,ignore
//! use cohora_core::{Session, SessionConfig};
//! use cohora_fs::WorkspaceFs;
//! use cohora_llm::{build_provider, ProviderKind, ProviderSettings};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fs = Arc::new(WorkspaceFs::open(".").await?);
//! let generator = build_provider(ProviderKind::Claude, &ProviderSettings::default())?;
//! let mut session = Session::new(fs, SessionConfig::default()).with_generator(generator);
//!
//! let outcome = session.handle_turn("create a readme for this project").await;
//! println!("{}\n{}", outcome.display, outcome.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod blocks;
pub mod checklist;
pub mod classifier;
pub mod confirmation;
pub mod context;
pub mod error;
pub mod normalize;
pub mod outcome;
pub mod policy;
pub mod prompt;
pub mod session;
pub mod types;

pub use blocks::{BlockSource, ContentBlock};
pub use checklist::{ChecklistItem, ItemStatus};
pub use classifier::{classify, ChangeKind, Classification, Intent};
pub use confirmation::{ConfirmationGate, PendingAction, Resolution};
pub use context::{ContextEntry, ContextStore, Exchange};
pub use error::{SessionError, SessionResult};
pub use outcome::{SideEffect, SkipReason, TurnOutcome};
pub use policy::{Decision, Grant, WriteContext};
pub use prompt::TaskKind;
pub use session::Session;
pub use types::{ActionSet, FileAction, SessionConfig, SessionId, WritePolicyMode};
