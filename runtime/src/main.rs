//! The `zebulon` binary.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use zebulon_runtime::cli::{self, output::OutputMode};
use zebulon_runtime::config::ScrapeConfig;

#[derive(Parser)]
#[command(name = "zebulon")]
#[command(about = "Scrape the Zebulon event listing into schema.org JSON-LD")]
#[command(version)]
struct Cli {
    /// Suppress progress output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print machine-readable results to stdout
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging and extra detail
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the live listing and write the JSON-LD document
    Scrape {
        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Listing page to fetch
        #[arg(long)]
        url: Option<String>,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Total attempts, including the first
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Base backoff delay in milliseconds
        #[arg(long)]
        base_delay_ms: Option<u64>,

        /// Navigation timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Show the browser window
        #[arg(long)]
        headed: bool,
    },

    /// Normalize a saved listing page without launching a browser
    Parse {
        /// Saved HTML of the listing page
        html_file: PathBuf,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the document to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    cli::output::init(OutputMode {
        quiet: cli.quiet,
        json: cli.json,
        verbose: cli.verbose,
        no_color: cli.no_color,
    });

    let level = if cli.verbose { "debug" } else { "info" };
    let directive = format!("zebulon_runtime={level}");
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(d) = directive.parse() {
        filter = filter.add_directive(d);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !cli.quiet && !cli.json {
                eprintln!("  error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Scrape {
            config,
            url,
            output,
            max_attempts,
            base_delay_ms,
            timeout_ms,
            headed,
        } => {
            let mut config = ScrapeConfig::load(config.as_deref())?;
            if let Some(url) = url {
                config.target_url = url;
            }
            if let Some(output) = output {
                config.output = output;
            }
            if let Some(n) = max_attempts {
                config.max_attempts = n;
            }
            if let Some(ms) = base_delay_ms {
                config.base_delay_ms = ms;
            }
            if let Some(ms) = timeout_ms {
                config.navigation_timeout_ms = ms;
            }
            if headed {
                config.headless = false;
            }
            cli::scrape_cmd::run(config).await
        }
        Commands::Parse {
            html_file,
            config,
            output,
            stdout,
        } => {
            let mut config = ScrapeConfig::load(config.as_deref())?;
            if let Some(output) = output {
                config.output = output;
            }
            cli::parse_cmd::run(&html_file, &config, stdout)
        }
    }
}
