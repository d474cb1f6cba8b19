use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use site_sanitizer::artifacts::{ArtifactKind, RawArtifact, SanitizedArtifact};
use site_sanitizer::batch::{self, BatchStats};
use site_sanitizer::config::{load_from_path, SanitizerConfig};
use site_sanitizer::sanitizer::{extract_single_block, Sanitizer};

#[derive(Parser)]
#[command(name = "site_sanitizer", about = "Repair LLM-generated React components and CSS")]
struct Cli {
    /// TOML file overriding tag sets, import denylist and baseline injection
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the raw code and style blocks found in a response
    Extract {
        /// Response file (default: stdin)
        input: Option<PathBuf>,
    },
    /// Print the first fenced block, or the whole text if there is none
    Block {
        input: Option<PathBuf>,
    },
    /// Fix attributes and drop denied imports in component code
    Code {
        input: Option<PathBuf>,
    },
    /// Repair a stylesheet
    Style {
        input: Option<PathBuf>,
    },
    /// Extract and repair one response
    Artifact {
        input: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sanitize a directory of responses into a React src/ tree
    Batch {
        /// Directory of .md/.txt responses (components/ and pages/ subdirectories allowed)
        dir: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "out")]
        out: PathBuf,
        /// Max responses to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_from_path(path)?,
        None => SanitizerConfig::default(),
    };
    let sanitizer = Sanitizer::new(config);

    let result = match cli.command {
        Commands::Extract { input } => {
            let text = read_input(input.as_deref())?;
            let pair = sanitizer.extract_pair(&text);
            if pair.is_empty() {
                tracing::warn!("No code or style block found");
            }
            println!("--- code ---\n{}\n--- style ---\n{}", pair.code, pair.style);
            Ok(())
        }
        Commands::Block { input } => {
            let text = read_input(input.as_deref())?;
            println!("{}", extract_single_block(&text));
            Ok(())
        }
        Commands::Code { input } => {
            let text = read_input(input.as_deref())?;
            println!("{}", sanitizer.sanitize_code(&text));
            Ok(())
        }
        Commands::Style { input } => {
            let text = read_input(input.as_deref())?;
            println!("{}", sanitizer.sanitize_style(&text));
            Ok(())
        }
        Commands::Artifact { input, json } => {
            let text = read_input(input.as_deref())?;
            let name = input
                .as_deref()
                .and_then(|p| p.file_stem())
                .and_then(|s| s.to_str())
                .unwrap_or("stdin")
                .to_string();
            let raw = RawArtifact {
                name,
                kind: ArtifactKind::Component,
                text,
            };
            let out = sanitizer.sanitize(&raw);
            if json {
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("--- code ---\n{}\n--- style ---\n{}", out.pair.code, out.pair.style);
                for line in &out.dropped_imports {
                    eprintln!("dropped: {}", line.trim());
                }
            }
            Ok(())
        }
        Commands::Batch { dir, out, limit } => {
            let raws = batch::load_responses(&dir, limit)?;
            if raws.is_empty() {
                println!("No .md/.txt responses found in {}.", dir.display());
                return Ok(());
            }

            println!("Sanitizing {} responses...", raws.len());
            let artifacts = process_artifacts(&sanitizer, &raws)?;
            let set = batch::collect_set(&artifacts);
            let written = batch::write_set(&out, &set)?;
            let manifest = batch::write_manifest(&out, &batch::build_manifest(&artifacts))?;

            print_table(&artifacts);
            BatchStats::tally(&artifacts).print();
            println!("Wrote {} files and {}", written, manifest.display());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p).with_context(|| format!("Failed to read {}", p.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn process_artifacts(sanitizer: &Sanitizer, raws: &[RawArtifact]) -> anyhow::Result<Vec<SanitizedArtifact>> {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(raws.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let artifacts = batch::sanitize_all(sanitizer, raws, &pb);
    pb.finish_and_clear();
    Ok(artifacts)
}

fn print_table(artifacts: &[SanitizedArtifact]) {
    println!(
        "{:>3} | {:<24} | {:<9} | {:>7} | {:>7} | {:>7}",
        "#", "Name", "Kind", "Code", "CSS", "Dropped"
    );
    println!("{}", "-".repeat(70));

    for (i, a) in artifacts.iter().enumerate() {
        let code = if a.code_missing { "-".to_string() } else { a.pair.code.len().to_string() };
        let css = if a.style_missing { "-".to_string() } else { a.pair.style.len().to_string() };
        println!(
            "{:>3} | {:<24} | {:<9} | {:>7} | {:>7} | {:>7}",
            i + 1,
            truncate(&a.name, 24),
            a.kind.dir_name(),
            code,
            css,
            a.dropped_imports.len()
        );
    }

    let missing: Vec<_> = artifacts.iter().filter(|a| a.code_missing).collect();
    if !missing.is_empty() {
        println!("\n--- No code extracted (needs a fallback) ---");
        for a in &missing {
            println!("  {}/{}", a.kind.dir_name(), a.name);
        }
    }
    println!();
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
