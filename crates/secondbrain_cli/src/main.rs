//! `secondbrain` command-line front end.
//!
//! # Responsibility
//! - Parse commands and forward them to `secondbrain_core::SecondBrain`.
//! - Render notes as plain text. No storage logic lives here.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secondbrain_core::{Note, NoteUpdate, SecondBrain};
use std::path::PathBuf;

const DEFAULT_STORAGE_PATH: &str = "brain_data.json";
const PREVIEW_CHARS: usize = 100;
const SEPARATOR_WIDTH: usize = 50;

#[derive(Parser)]
#[command(name = "secondbrain")]
#[command(about = "Second Brain - a personal knowledge base", long_about = None)]
#[command(version = secondbrain_core::core_version())]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Brain storage file
    #[arg(long, global = true, default_value = DEFAULT_STORAGE_PATH)]
    storage: PathBuf,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logs go to stderr otherwise
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new note
    Add {
        title: String,
        content: String,
        tags: Vec<String>,
    },
    /// List all notes
    List,
    /// Search notes by title, content or tag
    Search { query: String },
    /// Find notes by tag
    Tag { tag: String },
    /// List all tags
    Tags,
    /// Show a specific note
    Get { id: String },
    /// Update fields of a note
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        /// Replacement tag list
        #[arg(long, num_args = 0..)]
        tags: Option<Vec<String>>,
    },
    /// Delete a note
    Delete { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut brain = SecondBrain::open(&cli.storage)
        .with_context(|| format!("failed to open brain at `{}`", cli.storage.display()))?;
    if let Some(warning) = brain.load_warning() {
        eprintln!("Warning: Could not load brain data: {warning}");
    }

    match cli.command {
        Commands::Add {
            title,
            content,
            tags,
        } => {
            let note = brain.add_note(title, content, tags)?;
            println!("Added note with ID: {}", note.id);
            println!("{note}");
        }
        Commands::List => {
            let notes = brain.list_notes();
            if notes.is_empty() {
                println!("No notes found.");
            } else {
                println!("Found {} note(s):\n", notes.len());
                for note in notes {
                    print_summary(note);
                    println!("Created: {}", note.created_at);
                    println!("Preview: {}", note.preview(PREVIEW_CHARS));
                    print_separator();
                }
            }
        }
        Commands::Search { query } => {
            let notes = brain.search_notes(&query);
            if notes.is_empty() {
                println!("No notes found matching '{query}'.");
            } else {
                println!("Found {} note(s) matching '{query}':\n", notes.len());
                for note in notes {
                    print_summary(note);
                    print_separator();
                }
            }
        }
        Commands::Tag { tag } => {
            let notes = brain.get_notes_by_tag(&tag);
            if notes.is_empty() {
                println!("No notes found with tag '{tag}'.");
            } else {
                println!("Found {} note(s) with tag '{tag}':\n", notes.len());
                for note in notes {
                    println!("ID: {}", note.id);
                    println!("Title: {}", note.title);
                    print_separator();
                }
            }
        }
        Commands::Tags => {
            let tags = brain.get_all_tags();
            if tags.is_empty() {
                println!("No tags found.");
            } else {
                println!("All tags ({}):", tags.len());
                for tag in tags {
                    println!("  - {tag}");
                }
            }
        }
        Commands::Get { id } => match brain.get_note(&id) {
            Some(note) => print_detail(note),
            None => println!("Note with ID '{id}' not found."),
        },
        Commands::Update {
            id,
            title,
            content,
            tags,
        } => {
            let update = NoteUpdate {
                title,
                content,
                tags,
            };
            match brain.update_note(&id, update)? {
                Some(note) => {
                    println!("Updated note with ID: {}", note.id);
                    print_detail(&note);
                }
                None => println!("Note with ID '{id}' not found."),
            }
        }
        Commands::Delete { id } => {
            if brain.delete_note(&id)? {
                println!("Deleted note with ID: {id}");
            } else {
                println!("Note with ID '{id}' not found.");
            }
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> Result<()> {
    let level = effective_log_level(cli.log_level.as_deref(), cli.log_dir.is_some());
    let result = match cli.log_dir.as_deref() {
        Some(dir) => secondbrain_core::init_logging(level, dir),
        None => secondbrain_core::init_stderr_logging(level),
    };
    result.map_err(anyhow::Error::msg)
}

/// Stderr defaults to `error`: recovered problems are already printed as
/// user-facing warnings.
fn effective_log_level(explicit: Option<&str>, to_file: bool) -> &str {
    match explicit {
        Some(level) => level,
        None if to_file => secondbrain_core::default_log_level(),
        None => "error",
    }
}

fn print_summary(note: &Note) {
    println!("ID: {}", note.id);
    println!("Title: {}", note.title);
    if !note.tags.is_empty() {
        println!("Tags: {}", note.tags.join(", "));
    }
}

fn print_detail(note: &Note) {
    println!("{note}");
    println!("\nID: {}", note.id);
    println!("Created: {}", note.created_at);
    println!("Updated: {}", note.updated_at);
}

fn print_separator() {
    println!("{}", "-".repeat(SEPARATOR_WIDTH));
}
