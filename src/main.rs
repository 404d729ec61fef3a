// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! SwipeSort service
//!
//! Serves the triage page and the image API over a pending/approved/declined
//! directory layout.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use swipesort::config::AppConfig;
use swipesort::store::FileStore;
use swipesort::Result;

/// SwipeSort - swipe-to-triage image sorter
#[derive(Parser, Debug)]
#[command(name = "swipesort")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(about = "Swipe-to-triage image sorter", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "swipesort.json", global = true)]
    config: PathBuf,

    /// Directory holding the pending/approved/declined folders
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the web server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the images waiting in the pending directory
    List,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Create the working directories and a default configuration
    Init {
        /// Directory to initialize (default: current)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Force overwrite existing configuration
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "swipesort.json")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load configuration
    let mut config = AppConfig::load(&cli.config)?;
    if let Some(root) = &cli.root {
        config.storage.root = root.to_string_lossy().to_string();
    }

    match cli.command {
        Some(Commands::Serve { host, port }) => run_serve(config, host, port).await,
        Some(Commands::List) => run_list(config),
        Some(Commands::Config { action }) => run_config_command(config, action),
        Some(Commands::Init { dir, force }) => run_init(dir, force),
        None => run_serve(config, None, None).await,
    }
}

async fn run_serve(mut config: AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    // Apply CLI overrides
    if let Some(host) = host {
        config.web.host = host;
    }
    if let Some(port) = port {
        config.web.port = port;
    }
    config.validate()?;

    info!("SwipeSort v1.0.0");

    let store = FileStore::open(&config.storage)?;
    info!("Pending directory: {:?}", config.storage.pending_path());

    swipesort::web::start_server(config, store).await
}

fn run_list(config: AppConfig) -> Result<()> {
    let store = FileStore::open(&config.storage)?;
    let images = store.list_pending()?;

    if images.is_empty() {
        println!("No images waiting in {:?}", config.storage.pending_path());
    } else {
        for name in &images {
            println!("{}", name);
        }
        println!("\n{} remaining", images.len());
    }

    Ok(())
}

fn run_config_command(config: AppConfig, action: ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommands::Generate { output } => {
            AppConfig::default().save(&output)?;
            println!("Configuration written to {:?}", output);
        }
        ConfigCommands::Validate => {
            config.validate()?;
            println!("Configuration is valid");
        }
    }
    Ok(())
}

fn run_init(dir: Option<PathBuf>, force: bool) -> Result<()> {
    let target = dir.unwrap_or_else(|| PathBuf::from("."));
    let config_path = target.join("swipesort.json");

    if config_path.exists() && !force {
        return Err(swipesort::SwipeError::Config(format!(
            "{:?} already exists (use --force to overwrite)",
            config_path
        )));
    }

    std::fs::create_dir_all(&target)?;

    let mut config = AppConfig::default();
    config.storage.root = target.to_string_lossy().to_string();
    FileStore::open(&config.storage)?;
    config.save(&config_path)?;

    println!("SwipeSort initialized in {:?}", target);
    println!("\nCreated:");
    println!("  - swipesort.json");
    println!("  - {}/", config.storage.pending);
    println!("  - {}/", config.storage.approved);
    println!("  - {}/", config.storage.declined);
    println!("\nNext steps:");
    println!("  1. Drop images into {}/", config.storage.pending);
    println!("  2. Start the server: swipesort serve");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["swipesort"]).unwrap();
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("swipesort.json"));
    }

    #[test]
    fn test_cli_serve_overrides() {
        let cli = Cli::try_parse_from([
            "swipesort", "serve", "--port", "8080", "-H", "127.0.0.1", "--root", "/srv/photos"
        ]).unwrap();

        assert_eq!(cli.root, Some(PathBuf::from("/srv/photos")));
        match cli.command {
            Some(Commands::Serve { host, port }) => {
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
                assert_eq!(port, Some(8080));
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_config_generate() {
        let cli = Cli::try_parse_from([
            "swipesort", "config", "generate", "--output", "/tmp/s.json"
        ]).unwrap();

        match cli.command {
            Some(Commands::Config { action: ConfigCommands::Generate { output } }) => {
                assert_eq!(output, PathBuf::from("/tmp/s.json"));
            }
            _ => panic!("Expected Config Generate command"),
        }
    }

    #[test]
    fn test_init_creates_layout() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let target = dir.path().join("photos");

        run_init(Some(target.clone()), false).unwrap();
        assert!(target.join("swipesort.json").is_file());
        assert!(target.join("toSort").is_dir());

        assert!(run_init(Some(target.clone()), false).is_err());
        assert!(run_init(Some(target), true).is_ok());
    }
}
