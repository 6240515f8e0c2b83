//! snapdiff - immutable filesystem snapshots and structural diffs.
//!
//! Usage:
//!   snapdiff scan [PATH]             Capture a snapshot and show a summary
//!   snapdiff diff LEFT RIGHT         Compare two directory trees
//!   snapdiff export [PATH]           Export a snapshot as JSON
//!   snapdiff --help                  Show help

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, Context, Result};
use serde_json::json;

use snapdiff_diff::{ChangeFlags, ComparisonOptions, DiffReport, TreeComparator};
use snapdiff_scan::{FsReader, ScanOptions, Snapshot, SnapshotScanner};

#[derive(Parser)]
#[command(
    name = "snapdiff",
    version,
    about = "Immutable filesystem snapshots with structural and attribute diffing",
    long_about = "snapdiff captures a directory tree once and answers \"what changed\"\n\
                  between two such captures without re-touching the filesystem\n\
                  during comparison."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Capture a snapshot and show a summary
    Scan {
        /// Path to capture
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Skip hidden entries (names starting with .)
        #[arg(long)]
        skip_hidden: bool,

        /// Entry names to ignore (glob syntax, repeatable)
        #[arg(long = "ignore", value_name = "PATTERN")]
        ignore_patterns: Vec<String>,

        /// Maximum depth to capture
        #[arg(long)]
        max_depth: Option<u32>,
    },

    /// Compare two directory trees
    Diff {
        /// Left-hand tree
        left: PathBuf,

        /// Right-hand tree
        right: PathBuf,

        /// Compare ownership (uid, gid, permissions)
        #[arg(short = 'o', long)]
        ownership: bool,

        /// Compare properties (sizes, timestamps)
        #[arg(short = 'p', long)]
        properties: bool,

        /// Compare stream contents (reads both trees' file bytes)
        #[arg(short = 'c', long)]
        content: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Export a snapshot as JSON
    Export {
        /// Path to capture
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();

    match cli.command {
        Command::Scan {
            path,
            skip_hidden,
            ignore_patterns,
            max_depth,
        } => {
            run_scan(&path, skip_hidden, ignore_patterns, max_depth)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Diff {
            left,
            right,
            ownership,
            properties,
            content,
            format,
        } => {
            let mut options = ComparisonOptions::empty();
            if ownership {
                options |= ComparisonOptions::OWNERSHIP;
            }
            if properties {
                options |= ComparisonOptions::PROPERTIES;
            }
            if content {
                options |= ComparisonOptions::CONTENT;
            }
            run_diff(&left, &right, options, format)
        }
        Command::Export { path, output } => {
            run_export(&path, output)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Capture a snapshot and print a summary.
fn run_scan(
    path: &PathBuf,
    skip_hidden: bool,
    ignore_patterns: Vec<String>,
    max_depth: Option<u32>,
) -> Result<()> {
    let options = ScanOptions::builder()
        .include_hidden(!skip_hidden)
        .ignore_patterns(ignore_patterns)
        .max_depth(max_depth)
        .build()
        .map_err(|e| eyre!("{e}"))?;

    eprintln!("Scanning {}...", path.display());
    let scanner = SnapshotScanner::new();
    let snapshot = scanner.scan(path, &options).context("Scan failed")?;

    let captured: chrono::DateTime<chrono::Local> = snapshot.scanned_at.into();

    println!();
    println!("{}", "─".repeat(60));
    println!(
        " {} - {}",
        snapshot.root_path.display(),
        format_size(snapshot.total_bytes())
    );
    println!(
        " {} files, {} directories, {} symlinks",
        snapshot.stats.total_files, snapshot.stats.total_dirs, snapshot.stats.total_symlinks
    );
    println!(
        " Captured {} in {:.2}s",
        captured.format("%Y-%m-%d %H:%M:%S"),
        snapshot.scan_duration.as_secs_f64()
    );
    println!("{}", "─".repeat(60));
    println!();

    for child in snapshot.root.children() {
        let marker = if child.is_dir() {
            "/"
        } else if child.is_symlink() {
            "@"
        } else {
            ""
        };
        match child.data_size() {
            Some(size) => println!("  {}{marker} ({})", child.name, format_size(size)),
            None => println!("  {}{marker}", child.name),
        }
    }

    print_scan_warnings(&snapshot);

    Ok(())
}

/// Compare two trees and print the classified differences.
fn run_diff(
    left: &PathBuf,
    right: &PathBuf,
    options: ComparisonOptions,
    format: OutputFormat,
) -> Result<ExitCode> {
    let scan_options = ScanOptions::default();
    let scanner = SnapshotScanner::new();

    eprintln!("Scanning {}...", left.display());
    let left_snapshot = scanner
        .scan(left, &scan_options)
        .context("Left scan failed")?;
    eprintln!("Scanning {}...", right.display());
    let right_snapshot = scanner
        .scan(right, &scan_options)
        .context("Right scan failed")?;

    print_scan_warnings(&left_snapshot);
    print_scan_warnings(&right_snapshot);

    let comparator = TreeComparator::new(FsReader::new(), options);
    let report = comparator.compare(&left_snapshot, &right_snapshot);

    match format {
        OutputFormat::Text => print_report_text(&report),
        OutputFormat::Json => print_report_json(&report)?,
    }

    if report.has_differences() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Export a snapshot as pretty-printed JSON.
fn run_export(path: &PathBuf, output: Option<PathBuf>) -> Result<()> {
    eprintln!("Scanning {}...", path.display());
    let scanner = SnapshotScanner::new();
    let snapshot = scanner
        .scan(path, &ScanOptions::default())
        .context("Scan failed")?;

    let json = serde_json::to_string_pretty(&snapshot)?;

    match output {
        Some(output_path) => {
            std::fs::write(&output_path, json)?;
            eprintln!("Exported to {}", output_path.display());
        }
        None => {
            println!("{json}");
        }
    }

    Ok(())
}

/// Report entries omitted during a scan, attached to their paths.
fn print_scan_warnings(snapshot: &Snapshot) {
    for warning in &snapshot.warnings {
        eprintln!("warning: {}: {}", warning.path.display(), warning.message);
    }
}

fn print_report_text(report: &DiffReport) {
    for record in &report.records {
        if let Some(err) = &record.read_error {
            eprintln!("warning: {}: {}", record.relative_path.display(), err);
        }
        if record.flags.is_empty() {
            continue;
        }

        let path = record.relative_path.display();
        if record.flags.contains(ChangeFlags::REMOVED) {
            println!("removed   {path}");
        } else if record.flags.contains(ChangeFlags::ADDED) {
            println!("added     {path}");
        } else if record.flags.contains(ChangeFlags::REPLACED) {
            println!("replaced  {path}");
        } else {
            let detail = record.flags.names().join(", ").to_lowercase();
            println!("modified  {path} [{detail}]");
        }
    }

    let stats = &report.stats;
    println!();
    println!(
        "{} difference(s): {} added, {} removed, {} replaced, {} modified",
        stats.total_differences(),
        stats.added,
        stats.removed,
        stats.replaced,
        stats.modified
    );
    if stats.read_errors > 0 {
        println!("{} content read failure(s)", stats.read_errors);
    }
}

fn print_report_json(report: &DiffReport) -> Result<()> {
    let entries: Vec<serde_json::Value> = report
        .records
        .iter()
        .map(|record| {
            json!({
                "path": record.relative_path,
                "changes": record.flags.names(),
                "left": record.left_path,
                "right": record.right_path,
                "error": record.read_error,
            })
        })
        .collect();

    let value = json!({
        "differences": entries,
        "stats": {
            "added": report.stats.added,
            "removed": report.stats.removed,
            "replaced": report.stats.replaced,
            "modified": report.stats.modified,
            "bytes_read": report.stats.bytes_read,
            "read_errors": report.stats.read_errors,
        },
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
