//! Cohora - talk to your working directory
//!
//! Reads lines from stdin. Lines starting with `/` are commands; everything
//! else is a request handled by a [`cohora_core::Session`]. Logs go to stderr,
//! controlled by `COHORA_LOG` (default `warn`).

mod commands;
mod config;
mod repl;

use anyhow::Context as _;
use clap::Parser;
use cohora_core::Session;
use cohora_fs::WorkspaceFs;
use cohora_llm::ProviderKind;
use config::CliConfig;
use repl::Repl;
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "COHORA_LOG";

#[derive(Debug, Parser)]
#[command(name = "cohora", version, about = "Natural-language file assistant")]
struct Cli {
    /// Working directory; no file outside it is touched
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Provider to select at startup (claude, grok)
    #[arg(long)]
    provider: Option<ProviderKind>,

    /// Config file; defaults to cohora.toml in the working directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = CliConfig::load(cli.config.as_deref(), &cli.dir).await?;
    let fs = WorkspaceFs::open(&cli.dir)
        .await
        .with_context(|| format!("opening {}", cli.dir.display()))?;
    let session = Session::new(Arc::new(fs), config.session.clone());
    tracing::info!(session = %session.id(), dir = %cli.dir.display(), "session started");

    let startup = cli.provider.or(config.provider);
    let mut repl = Repl::new(session, config);

    println!("Cohora - type /help for commands");
    match startup {
        Some(kind) => match repl.select(kind) {
            Ok(()) => println!("Using {}", kind.display_name()),
            Err(err) => println!("Could not start {kind}: {err}"),
        },
        None => println!("No provider selected. Use /switch <name>."),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", repl.prompt());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let response = repl.dispatch(&line).await;
        if !response.text.is_empty() {
            println!("{}", response.text);
        }
        if response.exit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        let cli = Cli::try_parse_from(["cohora", "--dir", "work", "--provider", "grok", "-v"])
            .unwrap();
        assert_eq!(cli.dir, PathBuf::from("work"));
        assert_eq!(cli.provider, Some(ProviderKind::Grok));
        assert!(cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn bad_provider_flag() {
        assert!(Cli::try_parse_from(["cohora", "--provider", "gpt"]).is_err());
    }
}
