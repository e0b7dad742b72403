#![allow(
    clippy::cast_precision_loss,       // counts shown as f64 in the summary
    clippy::needless_pass_by_value,    // clap requires owned values
    clippy::fn_params_excessive_bools, // CLI commands have many boolean flags
)]

//! Segbench CLI - layout segmentation benchmark runner

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use segbench_cli::config::{
    self, Config, CONFIG_FILE_NAME, DEFAULT_LABELS_DIR, DEFAULT_MODEL, DEFAULT_PDFS_DIR,
    DEFAULT_RESULTS_DIR,
};
use segbench_cli::dataset::DatasetLayout;
use segbench_cli::report::{self, ReportFormats};
use segbench_cli::runner::{self, RunOptions, RunSummary};
use segbench_core::MatchThresholds;
use std::io;
use std::path::{Path, PathBuf};

/// Verbosity level for output control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Verbosity {
    /// Suppress all output except errors
    Quiet,
    /// Normal output (default)
    Normal,
    /// Extra details (`-v` info logs, `-vv` debug logs)
    Verbose(u8),
}

impl Verbosity {
    /// Create from CLI flags
    const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose > 0 {
            Self::Verbose(verbose)
        } else {
            Self::Normal
        }
    }

    /// Check if output should be shown (not quiet)
    const fn should_show_output(self) -> bool {
        !matches!(self, Self::Quiet)
    }

    const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose(1) => "info",
            Self::Verbose(_) => "debug",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "segbench",
    about = "Benchmark document layout segmentation against ground truth",
    version
)]
struct Args {
    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show detailed processing information (repeat for debug logs)
    #[arg(short, long, global = true, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Benchmark every prediction file in a directory
    Run {
        /// Directory with one `<document>.json` prediction file per document
        #[arg(value_name = "PREDICTIONS_DIR")]
        predictions_dir: PathBuf,

        /// Model name used for the report and overlay paths
        #[arg(short, long)]
        model: Option<String>,

        /// Ground-truth directory (`<dir>/<document>/labels.json`)
        #[arg(long, value_name = "DIR")]
        labels_dir: Option<PathBuf>,

        /// Source PDF directory (`<dir>/<document>/document.pdf`)
        #[arg(long, value_name = "DIR")]
        pdfs_dir: Option<PathBuf>,

        /// Output directory for reports and overlays
        #[arg(short, long, value_name = "DIR")]
        results_dir: Option<PathBuf>,

        /// Do not write annotated PDFs
        #[arg(long)]
        no_visualize: bool,

        /// Number of worker threads (default: one per CPU)
        #[arg(short, long, value_name = "N")]
        parallel: Option<usize>,

        /// Also write `<model>.json`
        #[arg(long)]
        json: bool,

        /// Also write `<model>.csv`
        #[arg(long)]
        csv: bool,

        /// Exit with an error if any document failed
        #[arg(long)]
        fail_on_error: bool,
    },

    /// Manage configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a commented `.segbench.toml` to the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let verbosity = Verbosity::from_flags(args.quiet, args.verbose);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(verbosity.log_filter()))
        .target(env_logger::Target::Stderr)
        .init();

    // Load configuration files
    let (user_config, project_config) = Config::discover_configs();
    let config = Config::merge(user_config, project_config);

    match args.command {
        Commands::Run {
            predictions_dir,
            model,
            labels_dir,
            pdfs_dir,
            results_dir,
            no_visualize,
            parallel,
            json,
            csv,
            fail_on_error,
        } => {
            // Resolve final values with precedence: CLI > config > defaults
            let settings = config.benchmark_settings();
            let options = RunOptions {
                model: model
                    .or(settings.model)
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                predictions_dir,
                layout: DatasetLayout {
                    labels_dir: labels_dir
                        .or(settings.labels_dir)
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_LABELS_DIR)),
                    pdfs_dir: pdfs_dir
                        .or(settings.pdfs_dir)
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_PDFS_DIR)),
                    results_dir: results_dir
                        .or(settings.results_dir)
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_DIR)),
                },
                thresholds: config.match_thresholds(),
                visualize: !no_visualize && settings.visualize.unwrap_or(true),
                parallel: parallel.or(settings.parallel),
                show_progress: verbosity.should_show_output(),
            };
            run_command(&options, ReportFormats { json, csv }, fail_on_error, verbosity)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                print!("{}", config.effective().to_toml()?);
                Ok(())
            }
            ConfigAction::Init { force } => {
                let path = Path::new(CONFIG_FILE_NAME);
                config::init_config(path, force)?;
                if verbosity.should_show_output() {
                    eprintln!("{} Wrote {}", "Info:".blue().bold(), path.display());
                }
                Ok(())
            }
        },
        Commands::Completions { shell } => {
            completion_command(shell);
            Ok(())
        }
    }
}

fn run_command(
    options: &RunOptions,
    formats: ReportFormats,
    fail_on_error: bool,
    verbosity: Verbosity,
) -> Result<()> {
    if verbosity.should_show_output() {
        let parallel_msg = match options.parallel {
            Some(1) => " (sequential)".to_string(),
            Some(n) => format!(" with {} workers", n.to_string().cyan()),
            None => String::new(),
        };
        eprintln!(
            "{} Benchmarking model {} from {}{}...",
            "Info:".blue().bold(),
            options.model.cyan(),
            options.predictions_dir.display(),
            parallel_msg
        );
        if options.thresholds != MatchThresholds::default() {
            eprintln!(
                "{} Custom thresholds: overlap {} / containment {} / merged {}",
                "Info:".blue().bold(),
                options.thresholds.overlap,
                options.thresholds.containment,
                options.thresholds.merged_match
            );
        }
    }

    let summary = runner::run(options)?;
    let written = report::write_reports(&summary.report, &options.layout, formats)?;

    if verbosity.should_show_output() {
        println!("{}", report::format_as_markdown(&summary.report));
        print_summary(&summary, &written);
    }

    let failed = summary.failed_count();
    if failed > 0 {
        for (name, message) in summary.failures() {
            eprintln!("{} {} - {}", "✗".red().bold(), name.bright_white(), message.red());
        }
        if fail_on_error {
            anyhow::bail!("Benchmark failed for {failed} documents");
        }
    }
    Ok(())
}

fn print_summary(summary: &RunSummary, written: &[PathBuf]) {
    let total = summary.documents.len();
    eprintln!("\n{}", "=== Benchmark Summary ===".bold());
    eprintln!("{:<16} {}", "Documents:", total.to_string().cyan());
    eprintln!("{:<16} {}", "Scored:", summary.scored_count().to_string().green());
    eprintln!("{:<16} {}", "No results:", summary.empty_count().to_string().normal());
    eprintln!("{:<16} {}", "Skipped:", summary.skipped_count().to_string().yellow());
    let failed = summary.failed_count();
    eprintln!(
        "{:<16} {}",
        "Failed:",
        if failed > 0 {
            failed.to_string().red()
        } else {
            failed.to_string().normal()
        }
    );
    eprintln!(
        "{:<16} {}",
        "Accuracy:",
        report::format_accuracy(summary.report.average.accuracy).bold()
    );
    let overlays = summary.documents.iter().filter(|d| d.overlay.is_some()).count();
    if overlays > 0 {
        eprintln!("{:<16} {}", "Overlays:", overlays.to_string().cyan());
    }
    eprintln!(
        "{:<16} {:.2}s ({:.2}s per document)",
        "Total time:",
        summary.elapsed_secs,
        if total > 0 {
            summary.elapsed_secs / total as f64
        } else {
            0.0
        }
    );
    for path in written {
        eprintln!("{} Wrote {}", "Info:".blue().bold(), path.display());
    }
}

/// Generate shell completion scripts
fn completion_command(shell: Shell) {
    let mut cmd = Args::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
