//! Session orchestration
//!
//! One [`Session`] owns the confirmation gate, the context store and the
//! current checklist. A turn runs start to finish before the next begins:
//!
//! 1. a pending delete consumes the line as its yes/no reply
//! 2. list and read requests are answered from the file system
//! 3. delete requests arm the gate and stop
//! 4. everything else is sent to the generator, and the reply's blocks are
//!    filtered through the write policy and persisted one at a time

use crate::blocks::{parse_blocks, redact, ContentBlock};
use crate::checklist::{extract_checklist, ChecklistItem};
use crate::classifier::{classify, Classification, Intent};
use crate::confirmation::{ConfirmationGate, PendingAction, Resolution};
use crate::context::{ContextEntry, ContextStore};
use crate::error::{SessionError, SessionResult};
use crate::outcome::{SideEffect, SkipReason, TurnOutcome};
use crate::policy::{after_probe, evaluate, Decision, WriteContext};
use crate::prompt::{build_task_prompt, build_turn_prompt, PromptParts, TaskKind};
use crate::types::{ActionSet, FileAction, SessionConfig, SessionId};
use cohora_fs::{DirEntry, FileSystem, RelativePath};
use cohora_llm::TextGenerator;
use std::sync::Arc;
use tracing::Instrument;

/// Interactive file-operations session
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    fs: Arc<dyn FileSystem>,
    generator: Option<Arc<dyn TextGenerator>>,
    config: SessionConfig,
    gate: ConfirmationGate,
    store: ContextStore,
    checklist: Vec<ChecklistItem>,
    span: tracing::Span,
}

impl Session {
    /// Create session over `fs` with no generator selected
    #[must_use]
    pub fn new(fs: Arc<dyn FileSystem>, config: SessionConfig) -> Self {
        let id = SessionId::new();
        let span = tracing::info_span!("session", id = %id);
        let store = ContextStore::new(config.file_context_capacity, config.exchange_limit);
        Self {
            id,
            fs,
            generator: None,
            config,
            gate: ConfirmationGate::new(),
            store,
            checklist: Vec::new(),
            span,
        }
    }

    /// With generator
    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Session ID
    #[inline]
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Configuration in effect
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// File system collaborator
    #[inline]
    #[must_use]
    pub fn fs(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    /// Replace or clear the generator
    pub fn set_generator(&mut self, generator: Option<Arc<dyn TextGenerator>>) {
        tracing::info!(
            parent: &self.span,
            generator = ?generator.as_ref().map(|g| g.name()),
            "generator changed"
        );
        self.generator = generator;
    }

    /// Name of the selected generator
    #[must_use]
    pub fn generator_name(&self) -> Option<&str> {
        self.generator.as_deref().map(|g| g.name())
    }

    /// Delete awaiting confirmation, if any
    #[inline]
    #[must_use]
    pub fn pending(&self) -> Option<&PendingAction> {
        self.gate.pending()
    }

    /// Context store
    #[inline]
    #[must_use]
    pub fn context(&self) -> &ContextStore {
        &self.store
    }

    /// Checklist from the latest generator reply
    #[inline]
    #[must_use]
    pub fn checklist(&self) -> &[ChecklistItem] {
        &self.checklist
    }

    /// Forget exchanges and any pending action; file context stays
    pub fn clear_history(&mut self) {
        self.store.clear_history();
        self.gate.reset();
    }

    /// Process one line of user input
    pub async fn handle_turn(&mut self, raw: &str) -> TurnOutcome {
        let span = self.span.clone();
        self.turn(raw).instrument(span).await
    }

    async fn turn(&mut self, raw: &str) -> TurnOutcome {
        let mut effects = Vec::new();

        match self.gate.resolve(raw) {
            Resolution::NothingPending => {}
            Resolution::Confirmed(action) => {
                self.delete_confirmed(&action.filename, &mut effects).await;
                return self.outcome(String::new(), effects);
            }
            Resolution::Cancelled(action) => {
                tracing::info!(filename = %action.filename, "delete cancelled");
                effects.push(SideEffect::DeleteCancelled {
                    filename: action.filename,
                });
                return self.outcome(String::new(), effects);
            }
            Resolution::Unrecognized(action) => {
                effects.push(SideEffect::ConfirmationNeeded {
                    filename: action.filename,
                });
                return self.outcome(String::new(), effects);
            }
        }

        let classification = classify(raw);

        if let Some(intent) = classification.short_circuit() {
            match intent {
                Intent::List => match self.list_files(None).await {
                    Ok(entries) => effects.push(SideEffect::Listed {
                        dir: ".".into(),
                        entries,
                    }),
                    Err(err) => effects.push(failure(".", "list", &err)),
                },
                Intent::Read { filename } => match self.read_file(filename).await {
                    Ok(content) => effects.push(SideEffect::Read {
                        filename: filename.clone(),
                        content,
                    }),
                    Err(err) => effects.push(failure(filename, "read", &err)),
                },
                _ => {}
            }
            return self.outcome(String::new(), effects);
        }

        let targets = classification.delete_targets();
        if let Some(first) = targets.first() {
            let filename = self.resolve_delete_target(raw, first).await;
            match check_path(&filename) {
                Ok(()) => {
                    self.gate.arm(PendingAction::delete(filename.clone()));
                    effects.push(SideEffect::DeleteRequested { filename });
                }
                Err(err) => effects.push(failure(&filename, "delete", &err)),
            }
            for extra in &targets[1..] {
                effects.push(SideEffect::DeleteNotQueued {
                    filename: (*extra).to_string(),
                });
            }
            return self.outcome(String::new(), effects);
        }

        self.generate_and_apply(raw, &classification, effects).await
    }

    async fn generate_and_apply(
        &mut self,
        raw: &str,
        classification: &Classification,
        mut effects: Vec<SideEffect>,
    ) -> TurnOutcome {
        let Some(generator) = self.generator.clone() else {
            effects.push(SideEffect::GenerationFailed {
                error: SessionError::NoProvider.to_string(),
            });
            return self.outcome(String::new(), effects);
        };

        let staged = self.stage_context(&classification.files, &mut effects).await;
        let prompt = self.turn_prompt(raw, &classification.actions, &staged).await;

        let reply = match generator.generate(&prompt).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(error = %err, "generation failed");
                effects.push(SideEffect::GenerationFailed {
                    error: err.to_string(),
                });
                return self.outcome(String::new(), effects);
            }
        };

        for entry in staged {
            self.store.insert(entry);
        }
        self.store.append_exchange(raw, reply.as_str());
        self.checklist = extract_checklist(&reply);

        let ctx = WriteContext::new(
            classification.files.clone(),
            classification.actions.clone(),
            self.config.write_policy,
        );
        let persisted = self.apply_blocks(&reply, &ctx, &mut effects).await;
        let display = redact(&reply, &persisted);
        self.outcome(display, effects)
    }

    /// Read every detected file that exists, without touching the store
    async fn stage_context(
        &self,
        files: &[String],
        effects: &mut Vec<SideEffect>,
    ) -> Vec<ContextEntry> {
        let mut staged = Vec::new();
        for filename in files {
            if let Err(err) = check_path(filename) {
                effects.push(failure(filename, "load", &err));
                continue;
            }
            if !self.fs.exists(filename).await {
                tracing::debug!(%filename, "not found, generator may create it");
                effects.push(SideEffect::Creatable {
                    filename: filename.clone(),
                });
                continue;
            }
            match self.fs.read(filename).await {
                Ok(content) => {
                    tracing::debug!(%filename, "auto-loaded for editing context");
                    effects.push(SideEffect::AutoLoaded {
                        filename: filename.clone(),
                    });
                    staged.push(ContextEntry::new(filename.clone(), content));
                }
                Err(err) => effects.push(failure(filename, "load", &SessionError::from(err))),
            }
        }
        staged
    }

    async fn turn_prompt(&self, raw: &str, actions: &ActionSet, staged: &[ContextEntry]) -> String {
        let available_files: Vec<String> = match self.fs.list(".").await {
            Ok(entries) => entries
                .into_iter()
                .filter(|e| !e.is_dir)
                .map(|e| e.name)
                .collect(),
            Err(err) => {
                tracing::warn!(error = %err, "could not list working directory");
                Vec::new()
            }
        };

        let mut context: Vec<&ContextEntry> = self
            .store
            .files()
            .filter(|held| !staged.iter().any(|s| s.filename == held.filename))
            .collect();
        context.extend(staged.iter());
        let history = self.store.recent_exchanges(self.config.prompt_history);
        let working_dir = self.fs.root().display().to_string();

        build_turn_prompt(&PromptParts {
            actions,
            working_dir: &working_dir,
            available_files: &available_files,
            context: &context,
            history: &history,
            preview_chars: self.config.context_preview_chars,
            request: raw,
        })
    }

    /// Persist every authorized block, returning the names written
    async fn apply_blocks(
        &mut self,
        reply: &str,
        ctx: &WriteContext,
        effects: &mut Vec<SideEffect>,
    ) -> Vec<String> {
        let parsed = parse_blocks(reply, self.config.min_block_chars);
        for short in parsed.skipped {
            effects.push(SideEffect::Skipped {
                filename: short.filename,
                reason: SkipReason::ContentTooShort {
                    length: short.length,
                },
            });
        }

        let mut persisted = Vec::new();
        for block in parsed.blocks {
            if let Err(err) = check_path(&block.filename) {
                tracing::warn!(filename = %block.filename, error = %err, "block path refused");
                effects.push(failure(&block.filename, "write", &err));
                continue;
            }
            let decision = match evaluate(&block, ctx) {
                Decision::Probe => after_probe(self.fs.exists(&block.filename).await),
                decision => decision,
            };
            let Decision::Allow(grant) = decision else {
                tracing::debug!(filename = %block.filename, "block not authorized");
                effects.push(SideEffect::Skipped {
                    filename: block.filename,
                    reason: SkipReason::NotAuthorized,
                });
                continue;
            };
            match self.persist(&block).await {
                Ok(()) => {
                    tracing::info!(filename = %block.filename, %grant, source = ?block.source, "block written");
                    effects.push(SideEffect::Written {
                        filename: block.filename.clone(),
                        length: block.content.chars().count(),
                        grant,
                    });
                    persisted.push(block.filename);
                }
                Err(err) => {
                    tracing::warn!(filename = %block.filename, error = %err, "block write failed");
                    effects.push(failure(&block.filename, "write", &err));
                }
            }
        }
        persisted
    }

    async fn persist(&mut self, block: &ContentBlock) -> SessionResult<()> {
        self.fs.write(&block.filename, &block.content).await?;
        self.store.upsert(block.filename.clone(), block.content.clone());
        Ok(())
    }

    /// Pick the real file behind a vague "copy of the readme"
    async fn resolve_delete_target(&self, raw: &str, captured: &str) -> String {
        let lower = raw.to_lowercase();
        if lower.contains("copy") && lower.contains("readme") {
            if let Ok(entries) = self.fs.list(".").await {
                if let Some(found) = entries.into_iter().find(|e| {
                    let name = e.name.to_lowercase();
                    !e.is_dir && name.contains("copy") && name.contains("readme")
                }) {
                    tracing::debug!(filename = %found.name, "matched described file");
                    return found.name;
                }
            }
        }
        captured.to_string()
    }

    async fn delete_confirmed(&mut self, filename: &str, effects: &mut Vec<SideEffect>) {
        if let Err(err) = check_path(filename) {
            effects.push(failure(filename, "delete", &err));
            return;
        }
        if !self.fs.exists(filename).await {
            effects.push(SideEffect::NotFound {
                filename: filename.to_string(),
            });
            return;
        }
        match self.delete_file(filename).await {
            Ok(()) => effects.push(SideEffect::Deleted {
                filename: filename.to_string(),
            }),
            Err(err) => effects.push(failure(filename, "delete", &err)),
        }
    }

    fn outcome(&self, display: String, effects: Vec<SideEffect>) -> TurnOutcome {
        TurnOutcome {
            display,
            effects,
            checklist: self.checklist.clone(),
        }
    }

    /// List a directory; the working directory when `dir` is `None`
    ///
    /// # Errors
    /// Returns file system errors, including boundary violations.
    pub async fn list_files(&self, dir: Option<&str>) -> SessionResult<Vec<DirEntry>> {
        let dir = dir.unwrap_or(".");
        Ok(self.fs.list(dir).await?)
    }

    /// Read a file and hold it in context
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidFilename`] or file system errors.
    pub async fn read_file(&mut self, filename: &str) -> SessionResult<String> {
        check_path(filename)?;
        let content = self.fs.read(filename).await?;
        self.store.upsert(filename, content.clone());
        Ok(content)
    }

    /// Write non-empty content to a file
    ///
    /// # Errors
    /// Returns [`SessionError::EmptyContent`] for empty content, else as
    /// [`read_file`](Self::read_file).
    pub async fn write_file(&mut self, filename: &str, content: &str) -> SessionResult<()> {
        check_path(filename)?;
        if content.is_empty() {
            return Err(SessionError::EmptyContent {
                name: filename.to_string(),
            });
        }
        self.fs.write(filename, content).await?;
        tracing::info!(%filename, "file written");
        self.store.upsert(filename, content);
        Ok(())
    }

    /// Create an empty file
    ///
    /// # Errors
    /// As [`read_file`](Self::read_file).
    pub async fn create_file(&mut self, filename: &str) -> SessionResult<()> {
        check_path(filename)?;
        self.fs.write(filename, "").await?;
        tracing::info!(%filename, "file created");
        self.store.upsert(filename, "");
        Ok(())
    }

    /// Delete a file without asking
    ///
    /// # Errors
    /// As [`read_file`](Self::read_file).
    pub async fn delete_file(&mut self, filename: &str) -> SessionResult<()> {
        check_path(filename)?;
        self.fs.remove(filename).await?;
        tracing::info!(%filename, "file deleted");
        self.store.remove(filename);
        Ok(())
    }

    /// Create a directory and its parents
    ///
    /// # Errors
    /// As [`read_file`](Self::read_file).
    pub async fn make_dir(&self, dirname: &str) -> SessionResult<()> {
        check_path(dirname)?;
        self.fs.mkdir(dirname).await?;
        tracing::info!(%dirname, "directory created");
        Ok(())
    }

    /// Run a guided refactor, debug or generate task
    ///
    /// Refactor and debug edit `target`; generate treats `target` as the kind
    /// of code wanted and may create new files.
    ///
    /// # Errors
    /// - [`SessionError::InvalidFilename`] when a required target is missing
    /// - [`SessionError::NoProvider`] when no generator is selected
    /// - file system errors reading a debug target
    /// - generator errors; session state is unchanged
    pub async fn run_task(
        &mut self,
        kind: TaskKind,
        target: &str,
        instructions: Option<&str>,
    ) -> SessionResult<TurnOutcome> {
        let span = self.span.clone();
        self.task(kind, target, instructions).instrument(span).await
    }

    async fn task(
        &mut self,
        kind: TaskKind,
        target: &str,
        instructions: Option<&str>,
    ) -> SessionResult<TurnOutcome> {
        let target = target.trim();
        if target.is_empty() {
            return Err(SessionError::invalid_filename(target, "a target is required"));
        }
        if kind.needs_target() {
            check_path(target)?;
        }
        let generator = self.generator.clone().ok_or(SessionError::NoProvider)?;

        let content = match kind {
            TaskKind::Debug => Some(self.fs.read(target).await?),
            TaskKind::Refactor | TaskKind::Generate => None,
        };
        let prompt = build_task_prompt(kind, target, instructions, content.as_deref());
        tracing::info!(?kind, %target, "running task");
        let reply = generator.generate(&prompt).await?;

        let ctx = match kind {
            TaskKind::Refactor | TaskKind::Debug => WriteContext::new(
                vec![target.to_string()],
                [FileAction::Edit].into_iter().collect(),
                self.config.write_policy,
            ),
            TaskKind::Generate => WriteContext::new(
                Vec::new(),
                [FileAction::Create].into_iter().collect(),
                self.config.write_policy,
            ),
        };
        let mut effects = Vec::new();
        let persisted = self.apply_blocks(&reply, &ctx, &mut effects).await;
        Ok(self.outcome(redact(&reply, &persisted), effects))
    }
}

/// Refuse unusable or escaping paths before any I/O
fn check_path(name: &str) -> SessionResult<()> {
    if name.trim().is_empty() {
        return Err(SessionError::invalid_filename(name, "empty filename"));
    }
    RelativePath::parse(name)?;
    Ok(())
}

fn failure(filename: &str, operation: &'static str, err: &SessionError) -> SideEffect {
    let filename = filename.to_string();
    if err.is_boundary_violation() || matches!(err, SessionError::InvalidFilename { .. }) {
        tracing::warn!(%filename, error = %err, "path refused");
        SideEffect::Rejected {
            filename,
            error: err.to_string(),
        }
    } else if err.is_not_found() {
        SideEffect::NotFound { filename }
    } else {
        tracing::warn!(%filename, operation, error = %err, "operation failed");
        SideEffect::Failed {
            filename,
            operation,
            error: err.to_string(),
        }
    }
}

