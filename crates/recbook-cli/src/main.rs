use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

use recbook::tree;
use recbook::{load_book_file, save_book_file, Book, Diagnostics, EnglishMessages, WriteOptions};

#[derive(Debug, Parser)]
#[command(
    name = "recbook",
    version,
    about = "Check, format and merge record book configuration files"
)]
struct Args {
    /// Keep reading documents written by a newer minor version
    #[arg(long, global = true)]
    accept_newer: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load a book and report any problems found
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Rewrite a book in canonical form
    Fmt {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Merge the configuration of INCOMING into LIVE and print the report.
    /// The merged book is only written when an output file is given.
    Merge {
        #[arg(value_name = "LIVE")]
        live: PathBuf,
        #[arg(value_name = "INCOMING")]
        incoming: PathBuf,
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Print the outline of any markup document
    Dump {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = run() {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    match args.command {
        Command::Check { file } => {
            let book = load(&file, args.accept_newer)?;
            let venues = book.config.venues.len();
            write_stdout(
                format!(
                    "{}: version {}, configuration {}, {venues} venues\n",
                    file.display(),
                    book.version,
                    book.config.version
                )
                .as_bytes(),
            )
        }
        Command::Fmt { file, output } => {
            let book = load(&file, args.accept_newer)?;
            let text = book.to_xml(&WriteOptions::default());
            write_output(&output, text.as_bytes())
        }
        Command::Merge {
            live,
            incoming,
            output,
        } => {
            let mut book = load(&live, args.accept_newer)?;
            let other = load(&incoming, args.accept_newer)?;
            let outcome = book.config.update(&other.config, &EnglishMessages);

            let mut text = outcome.report;
            text.push_str(&format!(
                "{} added, {} updated, {} identical, {} deleted\n",
                outcome.tally.added,
                outcome.tally.updated,
                outcome.tally.skipped,
                outcome.tally.deleted
            ));
            write_stdout(text.as_bytes())?;

            if let Some(path) = output {
                save_book_file(&book, &path, &WriteOptions::default())
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), changed = outcome.changed, "merged book written");
            }
            Ok(())
        }
        Command::Dump { file } => {
            let mut diagnostics = diagnostics_for(&file, args.accept_newer);
            let root = tree::load_file(&file, &mut diagnostics)
                .map_err(|e| anyhow::anyhow!("{e}\n{diagnostics}"))?;
            let outline = root.dump();
            debug!(nodes = outline.lines().count(), "dumped tree");
            write_stdout(outline.as_bytes())
        }
    }
}

fn diagnostics_for(path: &Path, accept_newer: bool) -> Diagnostics {
    let diagnostics = Diagnostics::new().with_filename(path.display().to_string());
    if accept_newer {
        diagnostics.accepting_newer()
    } else {
        diagnostics
    }
}

/// Load a book, logging warnings and failing with every diagnostic on error
fn load(path: &Path, accept_newer: bool) -> Result<Book> {
    if !path.exists() {
        bail!("no such file: {}", path.display());
    }
    let mut diagnostics = diagnostics_for(path, accept_newer);
    match load_book_file(path, &mut diagnostics) {
        Ok(book) => {
            for line in diagnostics.to_string().lines() {
                warn!("{line}");
            }
            Ok(book)
        }
        Err(e) => bail!("failed to load {}: {e}\n{diagnostics}", path.display()),
    }
}

fn write_stdout(data: &[u8]) -> Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(data).context("failed to write stdout")
}

fn write_output(path: &Option<PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => write_stdout(data),
    }
}
