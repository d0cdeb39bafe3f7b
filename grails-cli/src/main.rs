//! grails CLI tool

#![forbid(unsafe_code)]

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{ModelsCommand, ScaffoldCommand, ServeCommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grails")]
#[command(version)]
#[command(about = "Incremental CRUD scaffolding for Fiber + GORM projects", long_about = None)]
struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a complete CRUD resource
    Scaffold {
        /// Table name (`snake_case`, e.g., `post`, `order_item`)
        table: String,
        /// Field definitions (e.g., `title:VARCHAR(255)`, `quantity:INT`)
        #[arg(required = true)]
        fields: Vec<String>,
        /// Previously scaffolded table this one belongs to
        #[arg(long = "ref", value_name = "TABLE")]
        reference: Option<String>,
        /// Regenerate an entity that already exists
        #[arg(long)]
        replace: bool,
        /// Show what would change without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// List scaffolded entities
    Models,
    /// Start the development scaffolding server
    Serve {
        /// Address to bind (overrides `server.addr`)
        #[arg(long)]
        addr: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    grails_scaffold::observability::init()?;

    let project_root = match cli.project {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    tracing::debug!(project = %project_root.display(), "resolved project root");

    match cli.command {
        Commands::Scaffold {
            table,
            fields,
            reference,
            replace,
            dry_run,
        } => {
            let cmd = ScaffoldCommand::new(table, fields, reference, replace, dry_run);
            cmd.execute(&project_root)?;
        }
        Commands::Models => {
            ModelsCommand::execute(&project_root)?;
        }
        Commands::Serve { addr } => {
            ServeCommand::new(addr).execute(&project_root)?;
        }
    }

    Ok(())
}
