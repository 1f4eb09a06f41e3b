use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use paged_grid::actor::reactor::{PresentationEvent, replay};
use paged_grid::common::config::{Config, DEFAULT_CONFIG, config_file};
use paged_grid::common::log;

#[derive(Parser)]
struct Cli {
    /// Path to configuration file to use (overrides default).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the configuration file and list any problems.
    Validate,
    /// Re-run a recorded session and print the resulting grid.
    Replay {
        /// Recording written by the reactor.
        file: PathBuf,
        /// Print the final tile frames as JSON instead of a tree.
        #[arg(long)]
        json: bool,
    },
    /// Write the default configuration file.
    InitConfig {
        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    log::init_logging();

    let config_path = cli.config.clone().unwrap_or_else(config_file);
    let result = match &cli.command {
        Commands::Validate => validate(&config_path),
        Commands::Replay { file, json } => run_replay(file, *json),
        Commands::InitConfig { force } => init_config(&config_path, *force),
    };
    if let Err(e) = result {
        eprintln!("{e:#}");
        process::exit(1);
    }
}

fn validate(path: &Path) -> anyhow::Result<()> {
    let config = if path.exists() {
        Config::read(path)?
    } else {
        println!("{} not found, checking built-in defaults", path.display());
        Config::default()
    };
    let issues = config.validate();
    if issues.is_empty() {
        println!("configuration is valid");
        return Ok(());
    }
    for issue in &issues {
        println!("  - {issue}");
    }
    anyhow::bail!("{} issue(s) found in {}", issues.len(), path.display())
}

fn run_replay(file: &Path, json: bool) -> anyhow::Result<()> {
    let outcome = replay(file).with_context(|| format!("replaying {}", file.display()))?;
    for event in &outcome.presentation {
        match event {
            PresentationEvent::RequestPageScroll(scroll) => {
                println!("scroll to page {} (x = {})", scroll.page, scroll.offset_x)
            }
            PresentationEvent::DragCommitted { tile, from, to } => {
                println!("{tile} moved {from} -> {to}")
            }
        }
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.frames.snapshot())?);
    } else {
        print!("{}", outcome.engine.grid().draw_tree());
    }
    Ok(())
}

fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to replace it)", path.display());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, DEFAULT_CONFIG).with_context(|| format!("writing {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}
