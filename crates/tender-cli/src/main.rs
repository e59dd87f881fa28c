mod cmd;
mod menu;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{add::AddArgs, update::UpdateArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tender",
    about = "Interactive CLI for autonomous OpenCode schedules",
    version,
    propagate_version = true
)]
struct Cli {
    /// Repository root (default: auto-detect from .github/workflows or .git)
    #[arg(long, global = true, env = "TENDER_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Omit to open the interactive dashboard
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ensure .github/workflows exists
    Init,

    /// Add a tender non-interactively (agent-friendly)
    Add(AddArgs),

    /// Update a tender non-interactively (agent-friendly)
    Update(UpdateArgs),

    /// List managed tender workflows
    Ls,

    /// Remove a tender workflow
    Rm {
        /// Tender name
        name: String,
        /// Delete without confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Trigger an on-demand tender now via GitHub CLI
    Run {
        /// Tender name
        name: String,
        /// Prompt override for this dispatch
        #[arg(long)]
        prompt: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        None => menu::run(&root),
        Some(Commands::Init) => cmd::init::run(&root, cli.json),
        Some(Commands::Add(args)) => cmd::add::run(&root, args, cli.json),
        Some(Commands::Update(args)) => cmd::update::run(&root, args, cli.json),
        Some(Commands::Ls) => cmd::ls::run(&root, cli.json),
        Some(Commands::Rm { name, yes }) => cmd::rm::run(&root, &name, yes, cli.json),
        Some(Commands::Run { name, prompt }) => {
            cmd::run::run(&root, &name, prompt.as_deref(), cli.json)
        }
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
