//! Precis CLI - Section-by-section article summarisation
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use precis::api::{self, ErrorBody, ExportFile};
use precis::export::write_markdown;
use precis::{ArticleResult, Config, Pipeline};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "precis")]
#[command(author, version, about = "Section-by-section article summarisation", long_about = None)]
struct Cli {
    /// Path to a config file (defaults to precis.toml in cwd or ~/.config/precis)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Show debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise one or more articles by URL
    Summarise {
        /// URLs to summarise; duplicates are only fetched once
        #[arg(required = true)]
        urls: Vec<String>,
        /// Print results as JSON; several URLs print one array of results
        #[arg(long)]
        json: bool,
        /// Also write each result as Markdown into this directory
        #[arg(long, value_name = "DIR")]
        export: Option<PathBuf>,
    },
    /// Render saved JSON results as Markdown files
    Export {
        /// JSON file holding one result (`title` and `summaries`) or an array of them
        file: PathBuf,
        /// Directory to write the Markdown file into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Show which summarisation backend is configured
    Health,
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Summarise { urls, json, export } => {
            let config = load_config(cli.config)?;
            let pipeline = Pipeline::from_config(&config)?;

            let outcomes =
                futures::future::join_all(urls.iter().map(|url| pipeline.summarize(url))).await;

            let single = urls.len() == 1;
            let mut failures = 0;
            let mut results = Vec::new();
            for (url, outcome) in urls.iter().zip(outcomes) {
                match outcome {
                    Ok(result) => {
                        if !json {
                            print_result(&result);
                        }
                        if let Some(dir) = &export {
                            let path = write_markdown(dir, &result.title, &result.summaries)
                                .with_context(|| format!("failed to export {url}"))?;
                            eprintln!("Saved {}", path.display());
                        }
                        results.push(result);
                    }
                    Err(e) => {
                        failures += 1;
                        if json && single {
                            println!("{}", serde_json::to_string_pretty(&ErrorBody::from(&e))?);
                        } else {
                            eprintln!("{} {}: {}", "✗".red(), url, e);
                        }
                    }
                }
            }

            // one JSON document on stdout: an object for one URL, an array otherwise
            if json {
                if single {
                    if let Some(result) = results.first() {
                        println!("{}", serde_json::to_string_pretty(result)?);
                    }
                } else {
                    println!("{}", serde_json::to_string_pretty(&results)?);
                }
            }

            if failures > 0 {
                bail!("{} of {} articles could not be summarised", failures, urls.len());
            }
        }
        Commands::Export { file, output } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let saved: ExportFile = serde_json::from_str(&content)
                .with_context(|| format!("{} is not a saved summary", file.display()))?;

            for request in saved.into_requests() {
                let path = write_markdown(&output, &request.title, &request.summaries)?;
                println!("Saved {}", path.display());
            }
        }
        Commands::Health => {
            let config = load_config(cli.config)?;
            let pipeline = Pipeline::from_config(&config)?;
            println!("{}", serde_json::to_string_pretty(&api::handle_health(&pipeline))?);
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "precis", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Logs go to stderr so stdout stays clean for JSON and completions.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("precis={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_result(result: &ArticleResult) {
    println!("\n=== {} ===", result.title.bold());
    println!("{}\n", result.url.dimmed());

    for section in &result.summaries {
        println!("📌 {}", section.heading.cyan().bold());
        println!("  {}\n", section.summary);
    }
}
