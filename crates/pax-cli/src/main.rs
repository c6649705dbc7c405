//! PAX CLI - Command-line interface
//!
//! Usage:
//!   pax <html_file>
//!   pax <html_file> --all
//!   pax <html_file> --metadata [--json]
//!   pax <html_file> --save
//!
//! Author: hephaex@gmail.com

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pax_core::{AppConfig, LoggingConfig};
use pax_extractor::{AbstractExtractor, ExtractionResult, SelectionMode};

/// Characters of an abstract shown before truncation
const PREVIEW_CHARS: usize = 300;

#[derive(Parser)]
#[command(name = "pax")]
#[command(about = "Extract the abstract of a publication from an HTML page")]
#[command(version)]
struct Cli {
    /// HTML file to process
    html_file: PathBuf,

    /// Log extraction details
    #[arg(short, long)]
    verbose: bool,

    /// Print every distinct abstract, longest first
    #[arg(short, long, conflicts_with = "metadata")]
    all: bool,

    /// Print statistics for the best abstract
    #[arg(short, long)]
    metadata: bool,

    /// Print metadata as JSON
    #[arg(long, requires = "metadata")]
    json: bool,

    /// Write the best abstract to <file stem>_abstract.txt
    #[arg(long)]
    save: bool,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum abstract length in characters
    #[arg(long)]
    min_length: Option<usize>,

    /// Maximum abstract length in characters
    #[arg(long)]
    max_length: Option<usize>,
}

impl Cli {
    fn mode(&self) -> SelectionMode {
        if self.all {
            SelectionMode::All
        } else if self.metadata {
            SelectionMode::WithMetadata
        } else {
            SelectionMode::Best
        }
    }

    fn load_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?.with_env_override()?,
            None => AppConfig::from_env()?,
        };

        if let Some(min_length) = self.min_length {
            config.extractor.min_length = min_length;
        }
        if let Some(max_length) = self.max_length {
            config.extractor.max_length = max_length;
        }
        config.extractor.verbose |= self.verbose;
        config.extractor.validate()?;

        Ok(config)
    }
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let level = match logging.level.as_str() {
        "warn" | "error" if verbose => "info",
        level => level,
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// First `PREVIEW_CHARS` characters, with `...` when cut
fn preview(text: &str) -> String {
    let mut shown: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        shown.push_str("...");
    }
    shown
}

/// `<file stem>_abstract.txt`, relative to the working directory
fn output_path(html_file: &Path) -> PathBuf {
    let stem = html_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    PathBuf::from(format!("{stem}_abstract.txt"))
}

fn save(html_file: &Path, text: &str) -> anyhow::Result<()> {
    let path = output_path(html_file);
    std::fs::write(&path, text)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("\nAbstract saved to '{}'", path.display());
    Ok(())
}

fn report(cli: &Cli, result: &ExtractionResult) -> anyhow::Result<()> {
    match result {
        ExtractionResult::Best(text) => {
            println!("Abstract found ({} characters)\n", text.chars().count());
            println!("{}", preview(text));
        }
        ExtractionResult::Ranked(texts) => {
            println!("Found {} abstract(s)\n", texts.len());
            for (i, text) in texts.iter().enumerate() {
                println!("--- Abstract {} ({} characters) ---", i + 1, text.chars().count());
                println!("{}\n", preview(text));
            }
        }
        ExtractionResult::Detailed(metadata) if cli.json => {
            println!("{}", serde_json::to_string_pretty(metadata)?);
        }
        ExtractionResult::Detailed(metadata) => {
            println!("Abstract found\n");
            println!("Length: {} characters", metadata.length);
            println!("Words: {}", metadata.word_count);
            println!("Sentences: {}\n", metadata.sentence_count);
            println!("{}", metadata.text);
        }
        ExtractionResult::NotFound => {}
    }
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    let config = cli.load_config().context("Invalid configuration")?;
    init_tracing(&config.logging, config.extractor.verbose);

    let html = pax_core::read_html(&cli.html_file)
        .with_context(|| format!("Cannot process {}", cli.html_file.display()))?;
    tracing::debug!(path = %cli.html_file.display(), bytes = html.len(), "Document loaded");

    let extractor = AbstractExtractor::with_config(config.extractor)?;
    let result = extractor.run(&html, cli.mode());

    if !result.is_found() {
        eprintln!("No abstract found in {}", cli.html_file.display());
        return Ok(false);
    }

    if !cli.json {
        println!("Processing: {}\n", cli.html_file.display());
    }
    report(cli, &result)?;

    if cli.save {
        if let Some(best) = result.texts().first() {
            save(&cli.html_file, best)?;
        }
    }

    Ok(true)
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    Ok(if run(&cli)? {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
