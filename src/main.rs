//! gitlane - Git history graph and working-tree status
//!
//! Run with `gitlane` or `gitlane --help` for usage.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gitlane::{
    config::Config,
    git::{self, GitRunner},
    tui::{widgets::render_plain, App},
    APP_NAME, VERSION,
};

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(about = "Git history graph and working-tree status in the terminal")]
#[command(long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run as if started in this directory
    #[arg(short = 'C', value_name = "DIR")]
    directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive viewer (default)
    Tui,

    /// Exit successfully if the directory is inside a git work tree
    IsRepo,

    /// Show the commit graph
    Log {
        /// Number of commits to show (1-1000)
        #[arg(short = 'n', long)]
        max_count: Option<i64>,

        /// Print graph rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// List local branches
    Branches {
        #[arg(long)]
        json: bool,
    },

    /// Show working-tree status
    Status {
        #[arg(long)]
        json: bool,

        /// Include parent directories with their rolled-up status
        #[arg(long)]
        tree: bool,
    },

    /// Print a file as committed at HEAD
    Show {
        path: PathBuf,
    },

    /// Show configuration
    Config {
        /// Initialize config file with defaults
        #[arg(long)]
        init: bool,
    },
}

fn setup_logging(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        // Use info level for our crate, warn for dependencies
        EnvFilter::new("info").add_directive("tokio=warn".parse()?)
    };

    if let Some(path) = log_file {
        // Log to file when running the viewer so logs don't interfere with display
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(file).with_target(false))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .with(filter)
            .init();
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Path relative to the repository root for display
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks
    color_eyre::install()?;

    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = loaded.unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config, using defaults: {}", e);
        Config::default()
    });
    let debug = cli.debug || config.debug;

    let cwd = match cli.directory {
        Some(dir) => std::path::absolute(dir)?,
        None => std::env::current_dir()?,
    };
    let runner: GitRunner = config.runner();

    match cli.command {
        None | Some(Commands::Tui) => {
            let log_file = config.log_file_path();
            setup_logging(debug, Some(&log_file))?;

            info!("Starting gitlane viewer v{} in {}", VERSION, cwd.display());

            if !runner.check_installed().await {
                color_eyre::eyre::bail!("git executable not found on PATH");
            }

            let mut app = App::new(config, cwd);
            app.run().await?;
        }

        Some(Commands::IsRepo) => {
            setup_logging(debug, None)?;

            let is_repo = git::is_repo(&runner, &cwd).await;
            println!("{}", is_repo);
            if !is_repo {
                std::process::exit(1);
            }
        }

        Some(Commands::Log { max_count, json }) => {
            setup_logging(debug, None)?;
            git::require_repo(&runner, &cwd).await?;

            let max_count = max_count.unwrap_or(config.max_commits);
            let commits = git::get_commits(&runner, &cwd, max_count).await;
            let rows = gitlane::build_graph(&commits);

            if json {
                print_json(&rows)?;
            } else {
                for line in render_plain(&rows) {
                    println!("{}", line);
                }
            }
        }

        Some(Commands::Branches { json }) => {
            setup_logging(debug, None)?;
            git::require_repo(&runner, &cwd).await?;

            let branches = git::get_branches(&runner, &cwd).await;
            if json {
                print_json(&branches)?;
            } else {
                for branch in &branches {
                    let marker = if branch.is_current { '*' } else { ' ' };
                    println!("{} {}", marker, branch.name);
                }
            }
        }

        Some(Commands::Status { json, tree }) => {
            setup_logging(debug, None)?;
            git::require_repo(&runner, &cwd).await?;

            let status = if tree {
                git::get_status_tree(&runner, &cwd).await
            } else {
                git::get_status(&runner, &cwd).await
            };

            if json {
                print_json(&status)?;
            } else if status.is_empty() {
                println!("Working tree clean");
            } else {
                for (path, file_status) in &status {
                    println!("{} {}", file_status.letter(), display_path(path, &cwd));
                }
            }
        }

        Some(Commands::Show { path }) => {
            setup_logging(debug, None)?;
            git::require_repo(&runner, &cwd).await?;

            let path = if path.is_absolute() { path } else { cwd.join(path) };
            match git::file_at_head(&runner, &cwd, &path).await {
                Some(contents) => println!("{}", contents),
                None => {
                    eprintln!("{} is not committed at HEAD", display_path(&path, &cwd));
                    std::process::exit(1);
                }
            }
        }

        Some(Commands::Config { init }) => {
            setup_logging(debug, None)?;

            if init {
                let path = match &cli.config {
                    Some(path) => {
                        config.save_to(path)?;
                        path.clone()
                    }
                    None => config.save()?,
                };
                println!("Configuration initialized at {:?}", path);
            } else {
                println!("Configuration:");
                println!("{}", toml::to_string_pretty(&config)?);
                println!("\nConfig file: {:?}", Config::config_file_path()?);
                println!("Log file: {:?}", config.log_file_path());
            }
        }
    }

    Ok(())
}
