//! redline CLI - tracked-change extraction tool
//!
//! A command-line tool for extracting insertions, deletions, moves, and
//! comments from .docx files.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Tracked-change and comment extraction from Word documents
#[derive(Parser)]
#[command(
    name = "redline",
    version,
    about = "Extract tracked changes from Word documents",
    long_about = "redline - tracked-change extraction tool.\n\n\
                  Pulls insertions, deletions, moved text, and comments with their\n\
                  anchored text out of .docx files."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract tracked changes to JSON
    Json {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Show a summary of the document's tracked changes
    Info {
        /// Input file path
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Json {
            input,
            output,
            compact,
        } => {
            let pb = create_spinner("Extracting changes...");

            let result = redline::extract_file(&input)?;
            let json = if compact {
                result.to_json_compact()?
            } else {
                result.to_json()?
            };

            pb.finish_and_clear();
            write_output(output.as_ref(), &json)?;

            if output.is_some() {
                println!(
                    "{} Extracted to {}",
                    "✓".green().bold(),
                    output.unwrap().display()
                );
            }
        }

        Commands::Info { input } => {
            let pb = create_spinner("Extracting changes...");

            let result = redline::extract_file(&input)?;
            let summary = result.summary();

            pb.finish_and_clear();

            println!("{}", "Tracked Changes".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Insertions".bold(), summary.insertions);
            println!("{}: {}", "Deletions".bold(), summary.deletions);
            println!("{}: {}", "Moves".bold(), summary.moves);
            println!("{}: {}", "Comments".bold(), summary.comments);

            let authors: BTreeSet<&str> = result
                .insertions
                .iter()
                .chain(&result.deletions)
                .chain(&result.move_from)
                .chain(&result.move_to)
                .map(|change| change.author.as_str())
                .chain(result.comments.iter().map(|c| c.author.as_str()))
                .collect();

            if !authors.is_empty() {
                println!(
                    "{}: {}",
                    "Authors".bold(),
                    authors.into_iter().collect::<Vec<_>>().join(", ")
                );
            }

            if result.is_empty() {
                println!(
                    "\n{} No tracked changes or comments in document",
                    "!".yellow().bold()
                );
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn print_version() {
    println!("{} {}", "redline".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Tracked-change and comment extraction from Word documents");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
