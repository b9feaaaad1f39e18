//! Analytica: item-analysis dashboard CLI

use analytica::analyzer::Analyzer;
use analytica::config::{
    build_ignore_set, default_config_contents, is_ignored, load_config, Config, CONFIG_FILENAME,
};
use analytica::reporter::{ConsoleReporter, HtmlReporter, JsonReporter};
use analytica::watcher::ExportWatcher;
use analytica::ExamAnalysis;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use walkdir::WalkDir;

/// Past this many exports, decoding runs on the rayon pool
const PARALLEL_THRESHOLD: usize = 10;

/// Analytica: item-analysis quality dashboard for quiz exports
#[derive(Parser, Debug)]
#[command(name = "analytica")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Export file or directory of exports to analyze (omit when using a subcommand)
    #[arg(required = true)]
    path: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Write a self-contained HTML dashboard to this file
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Quiet mode (one line per dataset)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output
    #[arg(long, short)]
    verbose: bool,

    /// Watch for export changes and re-analyze
    #[arg(long)]
    watch: bool,

    /// Review gate: exit 1 when more than N items need review
    #[arg(long, value_name = "N")]
    max_review: Option<usize>,

    /// Item type excluded from charting (default "Aleatoria")
    #[arg(long, value_name = "TYPE")]
    random_item_type: Option<String>,

    /// Path to config file (default: search .analyticarc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .analyticarc.json with sensible defaults
    Init {
        /// Review gate to record in the config
        #[arg(long)]
        max_review: Option<usize>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    if let Some(Commands::Init { max_review, dir }) = args.command {
        return run_init(max_review, dir.as_deref());
    }

    let path = args
        .path
        .clone()
        .expect("path required when not using subcommand");

    // Resolve work directory for config search
    let work_dir = if path.is_file() {
        path.parent().unwrap_or(Path::new("."))
    } else {
        path.as_path()
    };

    let config = load_config(work_dir, args.config.as_deref())?
        .merge_with_cli(args.max_review, args.random_item_type.as_deref());

    if args.watch {
        return run_watch(&args, &path, &config);
    }

    run_analysis(&args, &path, &config)
}

/// One full pass: collect, decode, analyze, report, gate.
fn run_analysis(args: &Args, path: &Path, config: &Config) -> Result<ExitCode> {
    let export_files = collect_export_files(path, config)?;
    if export_files.is_empty() {
        eprintln!("{}: No export files found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    let analyzer = Analyzer::new().with_random_item_type(config.random_item_type());
    let results = analyze_files(&export_files, &analyzer, args.quiet);
    let stats = Analyzer::aggregate_stats(&results);

    if let Some(ref html_path) = args.html {
        let html = HtmlReporter::new().report(&results, &stats);
        fs::write(html_path, html)
            .with_context(|| format!("Failed to write HTML report to {}", html_path.display()))?;
        if !args.quiet {
            eprintln!(
                "{}: HTML report written to {}",
                "Info".blue(),
                html_path.display()
            );
        }
    }

    if args.json {
        let reporter = JsonReporter::new().pretty();
        if results.len() == 1 {
            println!("{}", reporter.report(&results[0]));
        } else {
            println!("{}", reporter.report_with_summary(&results, &stats));
        }
    } else if args.quiet {
        let reporter = console_reporter(args);
        for analysis in &results {
            reporter.report_quiet(analysis);
        }
    } else if args.html.is_none() {
        let reporter = console_reporter(args);
        if results.len() == 1 {
            reporter.report(&results[0]);
        } else {
            reporter.report_many(&results, &stats);
        }
    }

    // Review gate, the CI failure condition
    if let Some(max_review) = config.max_review {
        if stats.review_items > max_review {
            if !args.quiet && !args.json {
                eprintln!(
                    "{}: {} items need review (gate allows {})",
                    "Gate".red().bold(),
                    stats.review_items,
                    max_review
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_watch(args: &Args, path: &Path, config: &Config) -> Result<ExitCode> {
    let watcher = ExportWatcher::watch(path).context("Failed to start file watcher")?;
    eprintln!(
        "{}: watching {} for export changes (Ctrl+C to stop)",
        "Info".blue(),
        path.display()
    );

    // Re-analysis is idempotent, so every pass simply recomputes the
    // whole view from the files on disk.
    let _ = run_analysis(args, path, config)?;
    loop {
        let changes = watcher.next_changes();
        if changes.is_empty() {
            continue;
        }
        eprintln!(
            "{}: {} export(s) changed, re-analyzing",
            "Info".blue(),
            changes.len()
        );
        let _ = run_analysis(args, path, config)?;
    }
}

fn run_init(max_review: Option<usize>, dir: Option<&Path>) -> Result<ExitCode> {
    let dir = dir.unwrap_or(Path::new("."));
    let config_path = dir.join(CONFIG_FILENAME);
    if config_path.exists() {
        eprintln!(
            "{}: {} already exists, leaving it untouched",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }
    fs::write(&config_path, default_config_contents(max_review))
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created {}", config_path.display());
    Ok(ExitCode::SUCCESS)
}

/// Collect export files: a single file as-is, a directory recursively
/// (ignoring patterns from config), sorted for deterministic output.
fn collect_export_files(path: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Ok(vec![]);
    }

    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| ExportWatcher::is_export_file(p))
        .filter(|p| !is_ignored(p, ignore_set.as_ref()))
        .collect();
    files.sort();
    Ok(files)
}

fn analyze_files(files: &[PathBuf], analyzer: &Analyzer, quiet: bool) -> Vec<ExamAnalysis> {
    let analyze_one = |path: &PathBuf| match load_export(path) {
        Ok(value) => Some(analyzer.analyze(&value).with_source(path.clone())),
        Err(e) => {
            if !quiet {
                eprintln!("{}: {:#}", "Warning".yellow(), e);
            }
            None
        }
    };

    if files.len() > PARALLEL_THRESHOLD {
        files.par_iter().filter_map(analyze_one).collect()
    } else {
        files.iter().filter_map(analyze_one).collect()
    }
}

/// Read and deserialize one export. An unreadable file is an error the
/// caller skips with a warning; a file that is not valid JSON degrades
/// to the empty dataset instead of taking the whole run down.
fn load_export(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    match serde_json::from_str(&content) {
        Ok(value) => Ok(value),
        Err(e) => {
            eprintln!(
                "{}: {} is not valid JSON ({}); showing empty dataset",
                "Warning".yellow(),
                path.display(),
                e
            );
            Ok(Value::Null)
        }
    }
}

fn console_reporter(args: &Args) -> ConsoleReporter {
    let mut reporter = ConsoleReporter::new();
    if args.no_color {
        reporter = reporter.without_colors();
    }
    if args.verbose {
        reporter = reporter.verbose();
    }
    reporter
}
