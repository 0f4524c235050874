//! CLI entry point for the Critique design-critique assistant.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use critique_cli::chat::run_chat;
use critique_cli::intake::IntakeArgs;
use critique_cli::CritiqueRunner;
use critique_core::{CritiqueConfig, IdentityDocument, IdentityStore};
use critique_gateway::GeminiClient;
use critique_session::{ConversationContext, MarkdownNoteExporter, NoteExporter};

#[derive(Parser)]
#[command(name = "critique")]
#[command(about = "Reflective design critique: structured questions, lenses, and tradeoffs")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: critique).
    #[arg(short, long, default_value = "critique", global = true)]
    config: String,

    /// Override the identity document path.
    #[arg(long, global = true)]
    identity: Option<String>,

    /// Override the generation model.
    #[arg(long, global = true)]
    model: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one structured critique and print it.
    Run {
        #[command(flatten)]
        intake: IntakeArgs,

        /// Also write the critique as session notes to this file.
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,
    },
    /// Start an interactive session, optionally opening with a critique.
    Chat {
        #[command(flatten)]
        intake: IntakeArgs,
    },
    /// Show the assistant's purpose and developer.
    About,
    /// Print the identity document as loaded.
    Identity,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = CritiqueConfig::load(&cli.config)?;
    if let Some(path) = &cli.identity {
        config.identity_path = path.clone();
    }
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }

    let store = IdentityStore::new(&config.identity_path);

    match cli.command {
        Command::Identity => {
            let identity = load_identity(&store)?;
            println!("{}", identity.raw);
        }
        Command::About => {
            let identity = load_identity(&store)?;
            let purpose = if identity.goal.is_empty() {
                "Not specified"
            } else {
                identity.goal.as_str()
            };
            println!("Critique");
            println!("Purpose: {purpose}");
            println!("Developer: {}", identity.developer_name_or_placeholder());
            println!("Model: {}", config.model);
            println!("Identity: {}", store.path().display());
        }
        Command::Run { intake, export } => {
            let record = intake
                .resolve()?
                .context("No intake: pass --intake <FILE>, --example, or intake fields")?;
            let runner = build_runner(&config, &store)?;
            let mut ctx = ConversationContext::new();

            let result = runner.critique(&mut ctx, record).await;
            println!("{result}");

            if let Some(path) = export {
                let written = MarkdownNoteExporter::new(path).export(ctx.notes())?;
                eprintln!("Notes written to {}", written.display());
            }
        }
        Command::Chat { intake } => {
            let opening = intake.resolve()?;
            let runner = build_runner(&config, &store)?;
            let mut ctx = ConversationContext::new();
            let mut stdout = std::io::stdout();

            if let Some(record) = opening {
                let result = runner.critique(&mut ctx, record).await;
                println!("{result}\n");
            }

            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let notes_file = Path::new(&config.notes_file);
            run_chat(&runner, &mut ctx, stdin, &mut stdout, notes_file).await?;
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if json {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_identity(store: &IdentityStore) -> anyhow::Result<Arc<IdentityDocument>> {
    let path = store.path().display();
    store
        .get()
        .with_context(|| format!("Cannot load the identity document ({path})"))
}

fn build_runner(
    config: &CritiqueConfig,
    store: &IdentityStore,
) -> anyhow::Result<CritiqueRunner<GeminiClient>> {
    let identity = load_identity(store)?;
    let gateway = GeminiClient::from_config(config)?;
    tracing::info!(
        model = %config.model,
        developer = %identity.developer_name_or_placeholder(),
        "Critique ready"
    );
    Ok(CritiqueRunner::new(identity, gateway, config))
}
