/// Macro Analyzer - flags Office documents carrying suspicious VBA macros
///
/// The main entry point for the command-line tool. It parses arguments, sets up
/// logging and configuration, and classifies each requested file.

use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, ArgGroup, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;

use macro_analyzer::app;
use macro_analyzer::utils::output_formatter;
use macro_analyzer::{Config, ConsoleLogger, MacroAnalyzer, RuleSet};

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "macro_analyzer",
    version,
    about = "Flags Office documents that carry suspicious VBA macros",
    long_about = "Detects each file's MIME type with `file`, runs `olevba -a` on Word, Excel and
PowerPoint documents and reports macros that:
- execute automatically
- execute files
- download files
- contain suspicious strings"
)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .multiple(true)
        .args(["file_paths", "dir"]),
))]
struct Args {
    /// Path(s) to the file(s) to check
    #[arg(name = "file_paths")]
    file_paths: Vec<PathBuf>,

    /// Check all files in directory (recursively)
    #[arg(long = "dir")]
    dir: Option<PathBuf>,

    /// Maximum number of files taken from --dir (default: 1000)
    #[arg(long = "max-files", default_value = "1000")]
    max_files: usize,

    /// Path to configuration file (default: document_config.json next to the binary)
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Log "VIRUS Dangerous macro" instead of the matched flags
    #[arg(long = "hide-details", action = ArgAction::SetTrue)]
    hide_details: bool,

    /// Number of parallel workers (0=auto, default: auto)
    #[arg(long = "parallel", default_value = "0")]
    parallel: usize,

    /// Export results to JSON file
    #[arg(long = "json")]
    json: Option<PathBuf>,

    /// Export results to CSV file
    #[arg(long = "csv")]
    csv: Option<PathBuf>,

    /// Print a summary after scanning
    #[arg(long = "summary", action = ArgAction::SetTrue)]
    summary: bool,

    /// Show a progress bar on stderr
    #[arg(long = "progress", action = ArgAction::SetTrue)]
    progress: bool,

    /// Set logging level; "info" also shows clean files (default: WARN)
    #[arg(long = "log-level", default_value = "warn")]
    log_level: LevelFilter,

    /// Prefix log lines with the local time
    #[arg(long = "timestamps", action = ArgAction::SetTrue)]
    timestamps: bool,
}

/// Main entry point function
fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args);

    let config = Config::locate(args.config.as_deref())?;
    let rules = Arc::new(RuleSet::builtin().context("Failed to compile macro rules")?);
    let analyzer = MacroAnalyzer::from_config(&config, rules, Arc::new(ConsoleLogger));

    let files = app::collect_targets(&args.file_paths, args.dir.as_deref(), args.max_files);
    if files.is_empty() {
        eprintln!("{}", "Error: No files specified or found for analysis".red());
        eprintln!("Run with --help for usage information");
        process::exit(1);
    }

    let progress_bar = if args.progress {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let records = app::scan_files(
        &analyzer,
        &files,
        args.hide_details,
        args.parallel,
        progress_bar.as_ref(),
    )?;

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    if let Some(json_path) = &args.json {
        output_formatter::export_results_json(&records, json_path)?;
    }
    if let Some(csv_path) = &args.csv {
        output_formatter::create_csv_report(&records, csv_path)?;
    }

    if args.summary {
        println!("{}", output_formatter::format_summary(&records));
    }

    Ok(())
}

/// Send log lines to stdout, bare messages unless timestamps are requested
fn setup_logging(args: &Args) {
    let mut builder = env_logger::Builder::new();

    builder.filter_level(args.log_level);
    builder.target(env_logger::Target::Stdout);

    if args.timestamps {
        builder.format(|buf, record| {
            use chrono::Local;
            writeln!(
                buf,
                "{} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.args()
            )
        });
    } else {
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    }

    builder.init();
}
