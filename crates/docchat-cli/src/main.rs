mod terminal;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use docchat_client::{Config, DocChatApi, DocChatClient};
use docchat_core::{DocumentId, FileCandidate};
use docchat_flow::{AppContext, ChatFlow, Route, SendOutcome, UploadFlow, UploadOutcome};
use docchat_state::UploadProgress;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::terminal::{
    progress_line, spawn_progress_printer, TerminalNavigator, TerminalNotifier,
    TerminalTranscript,
};

#[derive(Parser)]
#[command(name = "docchat")]
#[command(about = "Upload a PDF and ask questions about it")]
#[command(version)]
struct Cli {
    /// Base URL of the answering service
    #[arg(long)]
    api_base: Option<String>,

    /// Enable debug logging
    #[arg(long, short, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a PDF, then chat about it
    Upload {
        path: PathBuf,
        /// Stop after the upload instead of opening a chat
        #[arg(long)]
        no_chat: bool,
    },
    /// Start an interactive chat
    Chat {
        #[arg(long)]
        document_id: Option<String>,
    },
    /// Ask a single question
    Ask {
        #[arg(long)]
        document_id: Option<String>,
        message: String,
    },
    /// Manage ingested documents
    Documents {
        #[command(subcommand)]
        command: DocumentCommands,
    },
}

#[derive(Subcommand)]
enum DocumentCommands {
    /// List ingested documents
    List,
    /// Delete an ingested document
    Delete { id: String },
}

struct App {
    ctx: AppContext,
    navigator: Arc<TerminalNavigator>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let mut config = Config::load();
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }
    tracing::debug!("Using service at {}", config.api_base);

    let upload = config.upload.clone();
    let api: Arc<dyn DocChatApi> =
        Arc::new(DocChatClient::new(config).context("Failed to build HTTP client")?);
    let navigator = Arc::new(TerminalNavigator::default());
    let ctx = AppContext::new(api, navigator.clone(), Arc::new(TerminalNotifier))
        .with_upload_config(upload);
    let app = App { ctx, navigator };

    match cli.command {
        Commands::Upload { path, no_chat } => upload_file(&app, path, no_chat).await,
        Commands::Chat { document_id } => {
            let chat = open_chat(&app, &chat_route(document_id))?;
            run_interactive_chat(&chat).await
        }
        Commands::Ask {
            document_id,
            message,
        } => {
            let chat = open_chat(&app, &chat_route(document_id))?;
            println!("{} {}", "You:".cyan().bold(), message);
            match chat.send(message).await {
                SendOutcome::Answered(_) => Ok(()),
                SendOutcome::Ignored(e) => Err(e.into()),
                SendOutcome::Failed(e) => Err(e.into()),
                SendOutcome::Busy => anyhow::bail!("A request is already in flight"),
            }
        }
        Commands::Documents { command } => match command {
            DocumentCommands::List => list_documents(&app).await,
            DocumentCommands::Delete { id } => delete_document(&app, &id).await,
        },
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_line_number(true)
                .with_file(false),
        )
        .init();
}

fn chat_route(document_id: Option<String>) -> Route {
    Route::Chat {
        document_id: document_id.and_then(DocumentId::parse),
    }
}

fn open_chat(app: &App, route: &Route) -> anyhow::Result<ChatFlow> {
    let chat = ChatFlow::from_route(app.ctx.clone(), Arc::new(TerminalTranscript), route)?;
    match chat.document_id() {
        Some(id) => println!("{}", format!("📄 Document: {}", id).dimmed()),
        None => println!("{}", "📄 No document selected".dimmed()),
    }
    Ok(chat)
}

async fn upload_file(app: &App, path: PathBuf, no_chat: bool) -> anyhow::Result<()> {
    let file = FileCandidate::from_path(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let file_name = file.name.clone();
    let flow = UploadFlow::new(app.ctx.clone());
    let printer = spawn_progress_printer(flow.subscribe());
    let outcome = flow.submit(vec![file]).await;
    printer.abort();

    match outcome {
        UploadOutcome::Completed(document_id) => {
            eprintln!(
                "{}",
                progress_line(&file_name, UploadProgress::COMPLETE).dimmed()
            );
            println!("{}", format!("✅ Uploaded as {}", document_id).green());
            let route = app
                .navigator
                .take()
                .unwrap_or_else(|| Route::chat(document_id));
            if no_chat {
                println!("{}", format!("Chat route: {}", route).dimmed());
                return Ok(());
            }
            let chat = open_chat(app, &route)?;
            run_interactive_chat(&chat).await
        }
        UploadOutcome::Rejected(e) => Err(e.into()),
        UploadOutcome::Failed(e) => Err(e.into()),
        UploadOutcome::Busy => anyhow::bail!("An upload is already in flight"),
    }
}

async fn run_interactive_chat(chat: &ChatFlow) -> anyhow::Result<()> {
    println!("{}", "🤖 Document Chat".cyan().bold());
    println!("{}", "Type 'exit' or 'quit' to leave".dimmed());
    println!();

    loop {
        print!("{} ", "You:".cyan().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let trimmed = input.trim();

        if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            println!("{}", "👋 Goodbye!".cyan());
            break;
        }

        chat.set_input(input.trim_end_matches(['\r', '\n']));
        match chat.submit_input().await {
            SendOutcome::Answered(_) | SendOutcome::Ignored(_) => {}
            SendOutcome::Busy => println!("{}", "⏳ Still waiting for the last answer".yellow()),
            SendOutcome::Failed(e) => tracing::debug!("Send failed: {:?}", e),
        }
    }

    Ok(())
}

async fn list_documents(app: &App) -> anyhow::Result<()> {
    let documents = app.ctx.api.list_documents().await?;
    if documents.is_empty() {
        println!("{}", "No documents uploaded yet".dimmed());
        return Ok(());
    }
    for doc in documents {
        println!(
            "{}  {}  {}",
            doc.id.cyan(),
            doc.name,
            doc.created_at.dimmed()
        );
    }
    Ok(())
}

async fn delete_document(app: &App, id: &str) -> anyhow::Result<()> {
    let document_id =
        DocumentId::parse(id).context("Document id must not be blank")?;
    app.ctx.api.delete_document(&document_id).await?;
    println!("{}", format!("🗑️  Deleted {}", document_id).green());
    Ok(())
}
