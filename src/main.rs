//! dochat CLI entry point

use clap::{Parser, Subcommand};
use dochat::error::Result;
use dochat::models::{Role, Turn, UploadCandidate};
use dochat::{ClientController, Config};
use indicatif::ProgressBar;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "dochat")]
#[command(version, about = "Chat with your documents from the terminal", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides the config file)
    #[arg(long, global = true, env = "DOCHAT_API_URL")]
    api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session (the default)
    Chat,

    /// Upload documents without entering the chat loop
    Upload {
        /// Files to upload
        files: Vec<PathBuf>,
    },

    /// Show configuration and backend health
    Status,

    /// Write a default config file
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Handle init command specially (doesn't need a valid existing config)
    if matches!(cli.command, Some(Commands::Init { .. })) {
        return handle_init(cli);
    }

    // Load configuration
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
        config.validate()?;
    }

    let mut controller = ClientController::new(config)?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat_loop(&mut controller).await?,

        Commands::Upload { files } => {
            if files.is_empty() {
                eprintln!("No files given. Usage: dochat upload <file>...");
                std::process::exit(1);
            }
            let candidates = read_candidates(&files)?;
            controller.submit_files(candidates).await;
            if let Some(turn) = controller.conversation().last() {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(turn)?);
                } else {
                    print_turn(turn);
                }
            }
        }

        Commands::Status => {
            let status = collect_status(&controller).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print_status(&status);
            }
        }

        Commands::Init { .. } => unreachable!(),
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::load_from(None),
    }
}

fn handle_init(cli: Cli) -> Result<()> {
    let Some(Commands::Init { force }) = cli.command else {
        unreachable!()
    };

    let config_path = cli
        .config
        .unwrap_or_else(Config::default_config_path);

    if config_path.exists() && !force {
        eprintln!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            config_path.display()
        );
        std::process::exit(1);
    }

    let mut config = Config::default();
    config.paths.base_dir = config_path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_base_dir);
    config.paths.config_file = config_path.clone();
    config.save()?;

    println!("✓ dochat initialized successfully");
    println!("  Config: {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Point api_url at your backend (or set DOCHAT_API_URL)");
    println!("  2. Upload documents: dochat upload report.pdf");
    println!("  3. Start asking: dochat");

    Ok(())
}

/// Interactive loop: plain lines are queries; slash commands manage the
/// session.
async fn run_chat_loop(controller: &mut ClientController) -> Result<()> {
    println!("dochat — ask questions about your documents.");
    println!("Commands: /upload <file>..., /reset, /quit\n");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            // EOF
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("/upload") {
            let paths: Vec<PathBuf> = rest.split_whitespace().map(PathBuf::from).collect();
            if paths.is_empty() {
                println!("Usage: /upload <file>...");
                continue;
            }
            let candidates = match read_candidates(&paths) {
                Ok(candidates) => candidates,
                Err(e) => {
                    eprintln!("Could not read files: {}", e);
                    continue;
                }
            };
            let spinner = spinner("Uploading...");
            controller.submit_files(candidates).await;
            spinner.finish_and_clear();
            if let Some(turn) = controller.conversation().last() {
                print_turn(turn);
            }
        } else if line == "/reset" {
            controller.reset();
            println!("Session cleared.");
        } else if line == "/quit" || line == "/exit" {
            break;
        } else if line.starts_with('/') {
            println!("Unknown command: {}", line);
        } else {
            let spinner = spinner("Thinking...");
            controller.submit_query(line.to_string()).await;
            spinner.finish_and_clear();
            if let Some(turn) = controller.conversation().last() {
                if turn.role == Role::Assistant {
                    print_turn(turn);
                }
            }
        }
    }

    Ok(())
}

fn read_candidates(paths: &[PathBuf]) -> Result<Vec<UploadCandidate>> {
    paths
        .iter()
        .map(|path| UploadCandidate::from_path(path))
        .collect()
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print an assistant turn: content, then its citations if any.
fn print_turn(turn: &Turn) {
    println!("\n{}\n", turn.content);
    if !turn.sources.is_empty() {
        println!("Sources:");
        for source in &turn.sources {
            println!("  • {}", source);
        }
        println!();
    }
}

/// Status information
#[derive(Debug, Clone, Serialize)]
struct StatusInfo {
    config_path: String,
    api_url: String,
    backend_reachable: bool,
    backend_healthy: bool,
}

async fn collect_status(controller: &ClientController) -> StatusInfo {
    let (backend_reachable, backend_healthy) = match controller.backend().health().await {
        Ok(healthy) => (true, healthy),
        Err(e) => {
            tracing::debug!("Backend health probe failed: {:?}", e);
            (false, false)
        }
    };

    StatusInfo {
        config_path: controller
            .config()
            .paths
            .config_file
            .display()
            .to_string(),
        api_url: controller.config().api_url.clone(),
        backend_reachable,
        backend_healthy,
    }
}

fn print_status(status: &StatusInfo) {
    println!("\n📊 dochat Status\n");
    println!("Configuration: {}", status.config_path);
    println!("Backend URL: {}", status.api_url);

    let backend_status = if status.backend_healthy {
        "✓ Connected"
    } else if status.backend_reachable {
        "⚠ Reachable but unhealthy"
    } else {
        "✗ Not reachable"
    };
    println!("Backend: {}", backend_status);
}
