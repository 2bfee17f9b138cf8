use clap::{Parser, Subcommand};
use colored::Colorize;
use intunepub::cmd;
use intunepub::config::AppConfig;
use intunepub::error::{IntunePubError, Result};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "intunepub",
    about = "Package WinGet apps with wintuner and publish them to Intune",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the configuration file (JSON, or TOML with a .toml extension)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactively package and publish batches of apps (default)
    Publish,

    /// Print the Intune app inventory
    Report(cmd::report::ReportArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = console::Term::stdout().show_cursor();
        println!();
        println!("{} Interrupted by user. Exiting.", "!".yellow().bold());
        std::process::exit(0);
    }) {
        eprintln!("{} Could not install Ctrl+C handler: {}", "!".yellow(), e);
    }

    match run().await {
        Ok(()) => {}
        Err(IntunePubError::Interrupted) => {
            println!("{} Interrupted by user. Exiting.", "!".yellow().bold());
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("intunepub=debug")
            .init();
    }

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Publish) {
        Commands::Publish => {
            cmd::publish::publish(&config).await?;
        }
        Commands::Report(args) => cmd::report::report(&config, args).await?,
    }

    Ok(())
}
