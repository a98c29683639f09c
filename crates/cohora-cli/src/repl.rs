//! Line dispatch for the interactive loop

use crate::commands::{Command, HELP};
use crate::config::CliConfig;
use cohora_core::{Session, SessionError, SideEffect, TaskKind, TurnOutcome};
use cohora_llm::{
    build_provider, GenerationResult, ProviderKind, ProviderSettings, TextGenerator,
};
use std::fmt::Write as _;
use std::sync::Arc;

/// Turns a provider choice into a ready generator
pub(crate) type Connector = Box<
    dyn Fn(ProviderKind, &ProviderSettings) -> GenerationResult<Arc<dyn TextGenerator>>
        + Send
        + Sync,
>;

/// Text to print after one line, and whether to stop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Response {
    /// Output, possibly empty
    pub(crate) text: String,
    /// Leave the loop
    pub(crate) exit: bool,
}

impl Response {
    fn say(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            exit: false,
        }
    }
}

/// Interactive state around a [`Session`]
pub(crate) struct Repl {
    session: Session,
    config: CliConfig,
    provider: Option<ProviderKind>,
    connect: Connector,
}

impl Repl {
    pub(crate) fn new(session: Session, config: CliConfig) -> Self {
        Self {
            session,
            config,
            provider: None,
            connect: Box::new(build_provider),
        }
    }

    /// Replace how providers are built
    #[must_use]
    pub(crate) fn with_connector(mut self, connect: Connector) -> Self {
        self.connect = connect;
        self
    }

    /// Prompt shown before each line
    pub(crate) fn prompt(&self) -> String {
        let provider = self.provider.map_or("none", ProviderKind::key);
        let context = match self.session.context().file_count() {
            0 => String::new(),
            n => format!("[{n}]"),
        };
        format!("{}@{provider}{context}> ", self.config.user_name)
    }

    /// Select a provider
    ///
    /// # Errors
    /// Returns the provider's construction error, leaving the current one.
    pub(crate) fn select(&mut self, kind: ProviderKind) -> GenerationResult<()> {
        let generator = (self.connect)(kind, self.config.settings(kind))?;
        self.session.set_generator(Some(generator));
        self.provider = Some(kind);
        Ok(())
    }

    /// Handle one input line
    pub(crate) async fn dispatch(&mut self, line: &str) -> Response {
        let line = line.trim();
        if line.is_empty() {
            return Response::default();
        }
        match Command::parse(line) {
            Some(command) => self.execute(command).await,
            None => Response::say(render(&self.session.handle_turn(line).await)),
        }
    }

    async fn execute(&mut self, command: Command) -> Response {
        tracing::debug!(?command, "slash command");
        let text = match command {
            Command::Switch(key) => self.switch(&key),
            Command::List => self.list_providers(),
            Command::Status => self.status(),
            Command::Current => match self.session.generator_name() {
                Some(name) => format!("Current provider: {name}"),
                None => "No provider selected.".to_string(),
            },
            Command::Reset => {
                self.session.set_generator(None);
                self.provider = None;
                "Reset current provider. Use /switch to choose again.".to_string()
            }
            Command::ClearHistory => {
                self.session.clear_history();
                "Conversation history and pending actions cleared.".to_string()
            }
            Command::Name(Some(name)) => {
                self.config.user_name = name;
                format!("User name set to: {}", self.config.user_name)
            }
            Command::Name(None) => format!(
                "Current user name: {}\nUse /name <your-name> to change it",
                self.config.user_name
            ),
            Command::Files(dir) => {
                let shown = dir.clone().unwrap_or_else(|| ".".to_string());
                match self.session.list_files(dir.as_deref()).await {
                    Ok(entries) => SideEffect::Listed {
                        dir: shown,
                        entries,
                    }
                    .to_string(),
                    Err(err) => error_text(&err),
                }
            }
            Command::Pwd => format!("Current directory: {}", self.session.fs().root().display()),
            Command::Read(file) => match self.session.read_file(&file).await {
                Ok(content) => SideEffect::Read {
                    filename: file,
                    content,
                }
                .to_string(),
                Err(err) => error_text(&err),
            },
            Command::Write { file, text } => match self.session.write_file(&file, &text).await {
                Ok(()) => format!("Wrote {file} ({} chars).", text.chars().count()),
                Err(err) => error_text(&err),
            },
            Command::Create(file) => match self.session.create_file(&file).await {
                Ok(()) => SideEffect::Created { filename: file }.to_string(),
                Err(err) => error_text(&err),
            },
            Command::Delete(file) => match self.session.delete_file(&file).await {
                Ok(()) => SideEffect::Deleted { filename: file }.to_string(),
                Err(err) => error_text(&err),
            },
            Command::Mkdir(dir) => match self.session.make_dir(&dir).await {
                Ok(()) => SideEffect::DirectoryCreated { dirname: dir }.to_string(),
                Err(err) => error_text(&err),
            },
            Command::Todo => self.checklist(),
            Command::Refactor { file, instructions } => {
                self.task(TaskKind::Refactor, &file, instructions.as_deref())
                    .await
            }
            Command::Debug(file) => self.task(TaskKind::Debug, &file, None).await,
            Command::Generate { kind, spec } => {
                self.task(TaskKind::Generate, &kind, spec.as_deref()).await
            }
            Command::Help => HELP.to_string(),
            Command::Exit => {
                return Response {
                    text: "Exiting Cohora. See you soon!".to_string(),
                    exit: true,
                };
            }
            Command::Unknown(name) => format!("Unknown command: /{name}"),
        };
        Response::say(text)
    }

    fn switch(&mut self, key: &str) -> String {
        let Ok(kind) = key.parse::<ProviderKind>() else {
            return format!("Unknown provider: {key}");
        };
        match self.select(kind) {
            Ok(()) => format!("Switched to {}", kind.display_name()),
            Err(err) => format!("Error: {err}"),
        }
    }

    fn list_providers(&self) -> String {
        let mut out = String::from("Providers:");
        for kind in ProviderKind::ALL {
            let marker = if self.provider == Some(kind) { '>' } else { ' ' };
            let _ = write!(
                out,
                "\n  {marker} {:<10} - {}",
                kind.key(),
                kind.display_name()
            );
        }
        out
    }

    fn status(&self) -> String {
        let Some(name) = self.session.generator_name() else {
            return "No provider selected.".to_string();
        };
        let mut out = format!("Current: {name}");
        let _ = write!(
            out,
            "\nDirectory: {}\nFiles in context: {}\nSession: {}",
            self.session.fs().root().display(),
            self.session.context().file_count(),
            self.session.id()
        );
        if let Some(pending) = self.session.pending() {
            let _ = write!(out, "\nAwaiting confirmation to delete {}", pending.filename);
        }
        out
    }

    fn checklist(&self) -> String {
        let items = self.session.checklist();
        if items.is_empty() {
            return "No checklist items found.".to_string();
        }
        let mut out = String::from("Checklist:");
        for item in items {
            let _ = write!(out, "\n  {item}");
        }
        out
    }

    async fn task(&mut self, kind: TaskKind, target: &str, instructions: Option<&str>) -> String {
        match self.session.run_task(kind, target, instructions).await {
            Ok(outcome) => render(&outcome),
            Err(err) => error_text(&err),
        }
    }
}

fn error_text(err: &SessionError) -> String {
    format!("Error: {err}")
}

/// Reply text followed by one line per side effect
fn render(outcome: &TurnOutcome) -> String {
    let summary = outcome.summary();
    match (outcome.has_display(), summary.is_empty()) {
        (true, true) => outcome.display.clone(),
        (true, false) => format!("{}\n\n{summary}", outcome.display),
        (false, _) => summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohora_core::SessionConfig;
    use cohora_fs::MemoryFs;
    use cohora_llm::ScriptedGenerator;
    use pretty_assertions::assert_eq;

    fn repl(files: &[(&str, &str)], replies: &[&str]) -> (Repl, Arc<MemoryFs>) {
        let fs = Arc::new(MemoryFs::with_files(files.iter().copied()));
        let session = Session::new(fs.clone(), SessionConfig::default());
        let replies: Vec<String> = replies.iter().map(ToString::to_string).collect();
        let connector: Connector = Box::new(move |_, _| {
            let generator: Arc<dyn TextGenerator> =
                Arc::new(ScriptedGenerator::with_replies(replies.clone()));
            Ok(generator)
        });
        let repl = Repl::new(session, CliConfig::default()).with_connector(connector);
        (repl, fs)
    }

    #[tokio::test]
    async fn exit_and_unknown() {
        let (mut repl, _) = repl(&[], &[]);
        assert_eq!(
            repl.dispatch("/nope").await.text,
            "Unknown command: /nope"
        );
        let response = repl.dispatch("/exit").await;
        assert!(response.exit);
        assert_eq!(repl.dispatch("").await, Response::default());
    }

    #[tokio::test]
    async fn provider_selection() {
        let (mut repl, _) = repl(&[], &[]);
        assert_eq!(repl.dispatch("/current").await.text, "No provider selected.");
        assert_eq!(repl.dispatch("/switch gpt").await.text, "Unknown provider: gpt");

        assert_eq!(repl.dispatch("/switch grok").await.text, "Switched to Grok (xAI)");
        assert_eq!(repl.dispatch("/current").await.text, "Current provider: Scripted");
        assert!(repl.dispatch("/list").await.text.contains("> grok"));
        assert_eq!(repl.prompt(), "user@grok> ");

        repl.dispatch("/reset").await;
        assert_eq!(repl.dispatch("/status").await.text, "No provider selected.");
        assert_eq!(repl.prompt(), "user@none> ");
    }

    #[tokio::test]
    async fn file_commands() {
        let (mut repl, fs) = repl(&[], &[]);
        assert_eq!(
            repl.dispatch("/write notes.txt hello world").await.text,
            "Wrote notes.txt (11 chars)."
        );
        assert_eq!(fs.content("notes.txt").as_deref(), Some("hello world"));
        assert_eq!(
            repl.dispatch("/read notes.txt").await.text,
            "Content of notes.txt:\nhello world"
        );
        assert_eq!(repl.dispatch("/create empty.txt").await.text, "Created file empty.txt.");
        assert_eq!(repl.dispatch("/mkdir src").await.text, "Created directory src.");
        assert_eq!(
            repl.dispatch("/files").await.text,
            "Files in .:\n  [FILE] empty.txt\n  [FILE] notes.txt\n  [DIR] src"
        );
        assert_eq!(repl.dispatch("/delete empty.txt").await.text, "Deleted empty.txt.");
        assert!(fs.content("empty.txt").is_none());
        assert_eq!(repl.prompt(), "user@none[1]> ");
    }

    #[tokio::test]
    async fn file_command_errors() {
        let (mut repl, _) = repl(&[], &[]);
        assert!(repl.dispatch("/read").await.text.starts_with("Error: "));
        assert!(repl.dispatch("/read ../etc/passwd").await.text.starts_with("Error: "));
        assert_eq!(
            repl.dispatch("/write a.txt").await.text,
            "Error: no content given for a.txt"
        );
    }

    #[tokio::test]
    async fn delete_confirmation_without_provider() {
        let (mut repl, fs) = repl(&[("old.txt", "bye")], &[]);
        let asked = repl.dispatch("delete old.txt").await.text;
        assert!(asked.contains("Please confirm"), "{asked}");
        assert_eq!(repl.dispatch("yes").await.text, "Deleted old.txt.");
        assert!(fs.content("old.txt").is_none());
    }

    #[tokio::test]
    async fn clear_history_drops_pending() {
        let (mut repl, fs) = repl(&[("old.txt", "bye")], &[]);
        repl.dispatch("delete old.txt").await;
        repl.dispatch("/clear-history").await;
        assert!(repl.session.pending().is_none());
        assert_eq!(fs.content("old.txt").as_deref(), Some("bye"));
    }

    #[tokio::test]
    async fn checklist_from_last_reply() {
        let (mut repl, _) = repl(&[], &["Plan:\n- [x] read code\n- [ ] write tests"]);
        assert_eq!(repl.dispatch("/todo").await.text, "No checklist items found.");
        repl.dispatch("/switch claude").await;
        let reply = repl.dispatch("what should I do next?").await.text;
        assert!(reply.starts_with("Plan:"));
        assert_eq!(
            repl.dispatch("/todo").await.text,
            "Checklist:\n  [x] read code\n  [ ] write tests"
        );
    }

    #[tokio::test]
    async fn debug_task_writes_fix() {
        let fix = "Fixed.\n```app.js\nconst x = 1;\nconsole.log(x);\n```";
        let (mut repl, fs) = repl(&[("app.js", "const x = ;")], &[fix]);
        assert!(repl.dispatch("/debug app.js").await.text.starts_with("Error: "));

        repl.dispatch("/switch claude").await;
        let text = repl.dispatch("/debug app.js").await.text;
        assert!(text.contains("[File content for app.js processed]"), "{text}");
        assert_eq!(
            fs.content("app.js").as_deref(),
            Some("const x = 1;\nconsole.log(x);")
        );
    }

    #[tokio::test]
    async fn name_and_help() {
        let (mut repl, _) = repl(&[], &[]);
        assert_eq!(repl.dispatch("/name ada").await.text, "User name set to: ada");
        assert!(repl.dispatch("/name").await.text.starts_with("Current user name: ada"));
        assert!(repl.dispatch("/help").await.text.contains("/clear-history"));
    }
}
