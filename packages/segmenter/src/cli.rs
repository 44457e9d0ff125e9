//! Command-line interface for the segmenter.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::boundary::{Verdict, VolumeFailure};
use crate::config::{load_settings, DEFAULT_SETTINGS_FILE};
use crate::error::{Result, SegmenterError};
use crate::segmenter::{IndexOrigin, RunOutcome, Segmenter};
use crate::source::{DirectorySource, VolumeSource};
use crate::store;

/// Familjebok Segmenter - Split OCR'd encyclopedia volumes into articles.
#[derive(Parser)]
#[command(name = "familjebok-segmenter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find article boundaries and assemble articles for all volumes.
    Segment {
        /// Settings file
        #[arg(short, long, default_value = DEFAULT_SETTINGS_FILE)]
        settings: PathBuf,

        /// Redo both phases even if their output exists
        #[arg(short, long)]
        force: bool,
    },

    /// Only find article boundaries and store the boundary index.
    Scan {
        /// Settings file
        #[arg(short, long, default_value = DEFAULT_SETTINGS_FILE)]
        settings: PathBuf,

        /// Rescan even if the boundary index exists
        #[arg(short, long)]
        force: bool,
    },

    /// Assemble articles from a stored boundary index.
    Assemble {
        /// Settings file
        #[arg(short, long, default_value = DEFAULT_SETTINGS_FILE)]
        settings: PathBuf,
    },

    /// Classify a single line against a volume's table of contents.
    Classify {
        /// Settings file
        #[arg(short, long, default_value = DEFAULT_SETTINGS_FILE)]
        settings: PathBuf,

        /// Volume key (e.g., ba)
        #[arg(long)]
        volume: String,

        /// Number of boundaries already accepted in the volume
        #[arg(long, default_value_t = 0)]
        cursor: usize,

        /// The line to classify
        line: String,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Segment { settings, force } => segment_command(&settings, force),
        Commands::Scan { settings, force } => scan_command(&settings, force),
        Commands::Assemble { settings } => assemble_command(&settings),
        Commands::Classify {
            settings,
            volume,
            cursor,
            line,
        } => classify_command(&settings, &volume, cursor, &line),
    }
}

fn open(settings: &Path) -> Result<Segmenter<DirectorySource>> {
    let config = load_settings(settings)?;
    Segmenter::from_config(config)
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Scanning volumes [{bar:30.cyan/blue}] {pos}/{len}")
            .expect("valid template"),
    );
    pb
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn print_failures(failures: &[VolumeFailure]) {
    if failures.is_empty() {
        return;
    }
    println!(
        "  {} {}",
        style("Skipped volumes:").yellow().bold(),
        style(failures.len()).yellow()
    );
    for failure in failures {
        println!("    {} {}", style(&failure.volume).cyan(), failure.error);
    }
}

/// Execute the segment command.
fn segment_command(settings: &Path, force: bool) -> Result<()> {
    let segmenter = open(settings)?.with_progress(progress_bar());

    println!(
        "{} {} volumes",
        style("Segmenting").bold(),
        style(segmenter.source().volume_keys().len()).cyan()
    );

    let summary = match segmenter.run(force)? {
        RunOutcome::AlreadyDone => {
            println!("{}", style("Segmentation already done!").green());
            return Ok(());
        }
        RunOutcome::Completed(summary) => summary,
    };

    let origin = match summary.index_origin {
        IndexOrigin::Loaded => "loaded",
        IndexOrigin::Scanned => "scanned",
        IndexOrigin::Resumed => "resumed",
    };
    println!("  Volumes: {} ({origin})", summary.volumes);
    println!("  Boundaries: {}", summary.boundaries);
    println!("  Articles: {}", summary.articles);
    print_failures(&summary.failures);

    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        segmenter.config().segmented_dir.display()
    );
    Ok(())
}

/// Execute the scan command.
fn scan_command(settings: &Path, force: bool) -> Result<()> {
    let segmenter = open(settings)?.with_progress(progress_bar());
    let index_path = segmenter.config().index_path();

    let (index, origin, failures) = segmenter.boundary_index(force)?;
    if origin == IndexOrigin::Loaded {
        println!(
            "{} {}",
            style("Boundary index already exists:").green(),
            index_path.display()
        );
        return Ok(());
    }

    println!("  Volumes: {}", index.len());
    println!(
        "  Boundaries: {}",
        index.values().map(Vec::len).sum::<usize>()
    );
    print_failures(&failures);

    println!();
    println!("{} {}", style("Saved to:").green().bold(), index_path.display());
    Ok(())
}

/// Execute the assemble command.
fn assemble_command(settings: &Path) -> Result<()> {
    let segmenter = open(settings)?;
    let index_path = segmenter.config().index_path();
    let articles_path = segmenter.config().articles_path();

    if !index_path.exists() {
        return Err(SegmenterError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Boundary index does not exist: {}", index_path.display()),
        )));
    }

    let index = store::load_index(&index_path)?;
    let pb = spinner("Assembling articles...");
    let report = segmenter.assemble(&index);

    pb.set_message("Saving articles...");
    if let Err(e) = store::save_articles(&articles_path, &report.articles) {
        pb.finish_and_clear();
        return Err(e);
    }
    pb.finish_and_clear();

    println!("  Articles: {}", report.articles.len());
    print_failures(&report.failures);

    println!();
    println!("{} {}", style("Saved to:").green().bold(), articles_path.display());
    Ok(())
}

/// Execute the classify command.
fn classify_command(settings: &Path, volume: &str, cursor: usize, line: &str) -> Result<()> {
    let segmenter = open(settings)?;
    let verdict = segmenter.classify_line(volume, cursor, line)?;

    match verdict {
        Verdict::Boundary(evidence) => {
            println!("{} ({evidence})", style("boundary").green().bold());
        }
        Verdict::Rejected => println!("{}", style("rejected").red().bold()),
        Verdict::Inconclusive => println!("{}", style("inconclusive").yellow()),
    }
    Ok(())
}
