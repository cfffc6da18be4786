use anyhow::{Context, Result};
use bulletscout::{
    errors::unify_path,
    render::{ReportRenderer, TextRenderer},
    search, write_report, ReportFormat, SearchConfig, SearchError, SearchOutput,
};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Find bullet points mentioning a keyword across a folder of documents",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ReportArgs {
    /// Configuration file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Document extensions to include (e.g. pdf,txt)
    #[arg(short = 'e', long)]
    extensions: Option<String>,

    /// Patterns to ignore (glob format)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Number of worker threads (default: min(8, CPU cores))
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Report file to write
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Report format (html|text|json); text without --output prints to the terminal
    #[arg(short = 'f', long)]
    format: Option<ReportFormat>,

    /// Show a progress bar while scanning
    #[arg(long)]
    progress: bool,

    /// Open the written report with the system's default application
    #[arg(long)]
    open: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a folder for a keyword and write a report
    Search {
        /// Root folder to scan recursively
        #[arg(short = 'd', long, default_value = ".")]
        root: PathBuf,

        /// Keyword to look for (case-insensitive)
        #[arg(short = 'k', long)]
        keyword: Option<String>,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Ask for the folder and keyword, then write a report
    Interactive {
        #[command(flatten)]
        report: ReportArgs,
    },
}

/// Exit status for errors that reject the invocation itself
const EXIT_CONFIG: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            exit_code(&e)
        }
    }
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<SearchError>() {
        Some(search_err) if search_err.is_fatal() => ExitCode::from(EXIT_CONFIG),
        _ => ExitCode::FAILURE,
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            root,
            keyword,
            report,
        } => {
            let config = build_config(root, keyword.unwrap_or_default(), &report)?;
            run_search(&config, &report)
        }
        Commands::Interactive { report } => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let root = prompt("Folder to search [.]: ", &mut input)?;
            let keyword = prompt("Keyword: ", &mut input)?;

            let root = if root.is_empty() {
                PathBuf::from(".")
            } else {
                PathBuf::from(root)
            };
            let config = build_config(root, keyword, &report)?;
            run_search(&config, &report)
        }
    }
}

fn prompt(label: &str, input: &mut impl BufRead) -> Result<String> {
    print!("{}", label.bold());
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

/// Layers CLI arguments over the configuration files
fn build_config(root: PathBuf, keyword: String, args: &ReportArgs) -> Result<SearchConfig> {
    let file_config = SearchConfig::load_from(args.config.as_deref())
        .map_err(|e| SearchError::config_error(e.to_string()))?;

    let defaults = SearchConfig::default();
    let cli_config = SearchConfig {
        keyword,
        root_path: root,
        file_extensions: args
            .extensions
            .as_ref()
            .map(|e| {
                e.split(',')
                    .map(|s| s.trim().trim_start_matches('.').to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.file_extensions),
        ignore_patterns: args.ignore.clone(),
        thread_count: args.threads,
        log_level: args.log_level.clone(),
        output_path: args.output.clone().unwrap_or(defaults.output_path),
        format: args.format.unwrap_or_default(),
        show_progress: args.progress,
    };

    let mut config = file_config.merge_with_cli(cli_config);
    if args.output.is_none() && config.format == ReportFormat::Json {
        config.output_path.set_extension("json");
    }
    init_logging(&config.log_level);
    Ok(config)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // Logs go to stderr so they never mix with a report on stdout
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run_search(config: &SearchConfig, args: &ReportArgs) -> Result<()> {
    let result = search(config)?;

    if config.format == ReportFormat::Text && args.output.is_none() {
        print!("{}", TextRenderer::colored().render(&result)?);
        return Ok(());
    }

    write_report(&result, config.format, &config.output_path)
        .with_context(|| format!("Failed to write {}", config.output_path.display()))?;
    let report_path = unify_path(&config.output_path);
    print_summary(&result, &report_path);

    if args.open {
        open_report(&report_path)?;
    }
    Ok(())
}

/// Hands the report to the platform's default opener without waiting for it
fn open_report(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    let mut command = Command::new("open");
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut command = Command::new("xdg-open");

    command
        .arg(path)
        .spawn()
        .with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(())
}

fn print_summary(result: &SearchOutput, report_path: &Path) {
    if result.is_empty() {
        println!(
            "No bullet points mention \"{}\" in {} documents",
            result.keyword, result.files_searched
        );
    } else {
        println!(
            "Found {} matches in {} files",
            result.len().to_string().green(),
            result.files_with_matches().to_string().green()
        );
    }
    println!(
        "Report written to {}",
        report_path.display().to_string().blue()
    );
}
