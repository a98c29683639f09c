//! Slash command parsing

/// One parsed `/command`
///
/// Missing arguments parse as empty strings; the executor reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// `/switch <provider>`
    Switch(String),
    /// `/list`
    List,
    /// `/status`
    Status,
    /// `/current`
    Current,
    /// `/reset`
    Reset,
    /// `/clear-history`
    ClearHistory,
    /// `/name [name]`
    Name(Option<String>),
    /// `/files [dir]`
    Files(Option<String>),
    /// `/pwd`
    Pwd,
    /// `/read <file>`
    Read(String),
    /// `/write <file> <text>`
    Write {
        /// Target file
        file: String,
        /// Everything after the filename
        text: String,
    },
    /// `/create <file>`
    Create(String),
    /// `/delete <file>`
    Delete(String),
    /// `/mkdir <dir>`
    Mkdir(String),
    /// `/todo`
    Todo,
    /// `/refactor <file> [instructions]`
    Refactor {
        /// Target file
        file: String,
        /// Free-form instructions
        instructions: Option<String>,
    },
    /// `/debug <file>`
    Debug(String),
    /// `/generate <kind> [spec]`
    Generate {
        /// Kind of code wanted
        kind: String,
        /// Free-form specification
        spec: Option<String>,
    },
    /// `/help`
    Help,
    /// `/exit`
    Exit,
    /// Anything else, without the slash
    Unknown(String),
}

impl Command {
    /// Parse a line; `None` unless it starts with `/`
    pub(crate) fn parse(line: &str) -> Option<Self> {
        let body = line.trim().strip_prefix('/')?;
        let (name, rest) = match body.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (body, ""),
        };
        let (first, tail) = match rest.split_once(char::is_whitespace) {
            Some((first, tail)) => (first.to_string(), tail.trim().to_string()),
            None => (rest.to_string(), String::new()),
        };
        let opt = |s: String| (!s.is_empty()).then_some(s);

        let command = match name.to_ascii_lowercase().as_str() {
            "switch" => Self::Switch(first),
            "list" => Self::List,
            "status" => Self::Status,
            "current" => Self::Current,
            "reset" => Self::Reset,
            "clear-history" => Self::ClearHistory,
            "name" => Self::Name(opt(first)),
            "files" => Self::Files(opt(first)),
            "pwd" => Self::Pwd,
            "read" => Self::Read(first),
            "write" => Self::Write {
                file: first,
                text: tail,
            },
            "create" => Self::Create(first),
            "delete" => Self::Delete(first),
            "mkdir" => Self::Mkdir(first),
            "todo" => Self::Todo,
            "refactor" => Self::Refactor {
                file: first,
                instructions: opt(tail),
            },
            "debug" => Self::Debug(first),
            "generate" => Self::Generate {
                kind: first,
                spec: opt(tail),
            },
            "help" => Self::Help,
            "exit" => Self::Exit,
            _ => Self::Unknown(name.to_string()),
        };
        Some(command)
    }
}

/// Text printed by `/help`
pub(crate) const HELP: &str = "\
Commands:
  Providers:
  /switch <provider>     Change the current provider (claude, grok)
  /list                  Show available providers
  /status                Show provider, directory and context size
  /current               Show the selected provider
  /reset                 Unselect the provider
  /clear-history         Clear conversation history and pending actions
  /name [new-name]       Set or show the user name

  Code tasks:
  /refactor <file> [how] Refactor a file
  /debug <file>          Find and fix problems in a file
  /generate <kind> [spec] Generate code (component, api, test, ...)

  Files:
  /files [dir]           List files in a directory
  /pwd                   Show the working directory
  /read <file>           Show a file
  /write <file> <text>   Write text to a file
  /create <file>         Create an empty file
  /delete <file>         Delete a file
  /mkdir <dir>           Create a directory
  /todo                  Show the checklist from the last reply

  Plain text is handled as a request, for example:
    'create readme file'              creates README.md
    'update index.js with a router'   edits index.js
    'delete oldfile.txt'              deletes after confirmation

  /help                  Show this message
  /exit                  Quit";

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(Command::parse("create readme"), None);
        assert_eq!(Command::parse("  "), None);
    }

    #[test]
    fn simple_commands() {
        assert_eq!(Command::parse("/list"), Some(Command::List));
        assert_eq!(Command::parse("  /HELP "), Some(Command::Help));
        assert_eq!(Command::parse("/clear-history"), Some(Command::ClearHistory));
        assert_eq!(Command::parse("/files"), Some(Command::Files(None)));
        assert_eq!(
            Command::parse("/files src"),
            Some(Command::Files(Some("src".into())))
        );
    }

    #[test]
    fn write_keeps_the_whole_tail() {
        assert_eq!(
            Command::parse("/write notes.txt hello  there world"),
            Some(Command::Write {
                file: "notes.txt".into(),
                text: "hello  there world".into(),
            })
        );
    }

    #[test]
    fn task_arguments() {
        assert_eq!(
            Command::parse("/refactor app.js split into modules"),
            Some(Command::Refactor {
                file: "app.js".into(),
                instructions: Some("split into modules".into()),
            })
        );
        assert_eq!(
            Command::parse("/generate api"),
            Some(Command::Generate {
                kind: "api".into(),
                spec: None,
            })
        );
        assert_eq!(Command::parse("/debug"), Some(Command::Debug(String::new())));
    }

    #[test]
    fn unknown_keeps_the_name() {
        assert_eq!(
            Command::parse("/analyze src"),
            Some(Command::Unknown("analyze".into()))
        );
    }
}
