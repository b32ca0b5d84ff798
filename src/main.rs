use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use jit_rebase::config::{load_or_default, PipelineConfig};
use jit_rebase::{tree_from_path, ClassMap, DotReporter, Pipeline, Report};
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jit-patch")]
#[command(about = "Patch parsed source trees before they are executed", long_about = None)]
#[command(version)]
struct Cli {
    /// Pipeline config (TOML); defaults to a single rebase patcher
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline over a JSON node tree and print the result
    Patch {
        /// Node tree produced by the parser (JSON)
        #[arg(short, long)]
        tree: PathBuf,

        /// Absolute path of the source unit the tree was parsed from
        #[arg(short, long)]
        path: PathBuf,

        /// Print the patched tree as JSON instead of rendered source
        #[arg(long, conflicts_with = "diff")]
        json: bool,

        /// Show unified diff of the rendered source
        #[arg(short, long)]
        diff: bool,
    },

    /// Print the file the pipeline would read for a class
    Locate {
        /// Fully-qualified class name
        #[arg(long)]
        class: String,

        /// File proposed by the loader
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Feed spec outcomes (JSON array) through the dot reporter
    Report {
        /// Outcome records
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Patch {
            tree,
            path,
            json,
            diff,
        } => cmd_patch(&config, &tree, &path, json, diff),

        Commands::Locate { class, file } => cmd_locate(&config, &class, &file),

        Commands::Report { input } => cmd_report(&config, &input),
    }
}

fn cmd_patch(
    config: &PipelineConfig,
    tree_path: &Path,
    source_path: &Path,
    json: bool,
    show_diff: bool,
) -> Result<ExitCode> {
    let mut tree = tree_from_path(tree_path)?;
    let original = tree.render();

    let pipeline = Pipeline::from_config(config);
    debug!(patchers = ?pipeline, "built pipeline");
    pipeline.process(&mut tree, source_path);

    if json {
        let out = serde_json::to_string_pretty(&tree).context("failed to serialize tree")?;
        println!("{out}");
    } else if show_diff {
        display_diff(source_path, &original, &tree.render());
    } else {
        print!("{}", tree.render());
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_locate(config: &PipelineConfig, class: &str, file: &Path) -> Result<ExitCode> {
    let loader: ClassMap = [(class, file)].into_iter().collect();
    let pipeline = Pipeline::from_config(config);
    let located = pipeline
        .resolve(&loader, class)
        .with_context(|| format!("no file registered for class {class}"))?;
    println!("{}", located.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_report(config: &PipelineConfig, input: &Path) -> Result<ExitCode> {
    let contents = fs::read_to_string(input)
        .with_context(|| format!("failed to read outcomes from {}", input.display()))?;
    let reports: Vec<Report> = serde_json::from_str(&contents)
        .with_context(|| format!("malformed outcome records in {}", input.display()))?;

    let stdout = io::stdout();
    let mut reporter = DotReporter::from_config(stdout.lock(), &config.reporter);
    reporter.begin(reports.len())?;
    for report in reports {
        reporter.report(report)?;
    }
    let summary = reporter.end()?;

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Show unified diff between original and patched source
fn display_diff(file: &Path, original: &str, patched: &str) {
    println!("{}", format!("--- {} (original)", file.display()).dimmed());
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, patched);

    for change in diff.iter_all_changes() {
        let line = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", line);
    }
}
