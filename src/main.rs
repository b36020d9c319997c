use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use unsplash_cli::client::{Authenticator, ClientIdAuth, HttpTransport, Transport};
use unsplash_cli::commands::{
    create_command, download_with_progress, run_command, Command, CommandParams, PostProcessing,
    DEFAULT_MAX_RESULTS,
};
use unsplash_cli::config::load_config;
use unsplash_cli::models::Photo;
use unsplash_cli::ui::{self, OutputFormat, Spinner, Status};

/// Unsplash CLI - Search, list and download photos from Unsplash
#[derive(Parser, Debug)]
#[command(name = "unsplash-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search, list and download photos from Unsplash", long_about = None)]
struct Cli {
    /// Command to run: get-random-photo or search-by-keyword
    command: String,

    /// Download images into this directory
    #[arg(long)]
    download_folder: Option<PathBuf>,

    /// Query images by this keyword (search-by-keyword)
    #[arg(long)]
    query: Option<String>,

    /// Maximum number of returned results (search-by-keyword)
    #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
    max_results: usize,

    /// Number of random photos, at most 30 (get-random-photo)
    #[arg(long, default_value_t = 1)]
    count: u32,

    /// Download variant: raw, full, regular, small or thumb
    #[arg(long)]
    format: Option<String>,

    /// Access key (overrides UNSPLASH_CLIENT_ID and the config file)
    #[arg(long)]
    client_id: Option<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Enable verbose logging (-v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("unsplash_cli={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn spinner_message(command: &Command) -> String {
    match command {
        Command::RandomPhoto { count } => format!("Fetching {} random photo(s)...", count),
        Command::KeywordSearch { query, max_results } => {
            format!("Searching up to {} photos for \"{}\"...", max_results, query)
        }
    }
}

async fn post_process(
    step: &PostProcessing,
    transport: &dyn Transport,
    photos: &[Photo],
    cli: &Cli,
    show_progress: bool,
) -> Result<()> {
    match step {
        PostProcessing::Download {
            destination,
            format,
        } => {
            let bar = ui::create_progress_bar(photos.len() as u64, "Downloading", show_progress);
            let result =
                download_with_progress(transport, photos, destination, format, |_, _| bar.inc(1))
                    .await;
            bar.finish_and_clear();

            let saved = result.context("download failed")?;
            if !cli.quiet {
                ui::print_status(
                    Status::Download,
                    &format!("Saved {} photos to {}", saved.len(), destination.display()),
                );
            }
        }
    }
    Ok(())
}

async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref()).context("failed to load configuration")?;

    let params = CommandParams {
        query: cli.query.clone(),
        max_results: cli.max_results,
        count: cli.count,
        download_folder: cli.download_folder.clone(),
        format: cli
            .format
            .clone()
            .unwrap_or_else(|| config.download_format.clone()),
    };
    let invocation = create_command(&cli.command, &params)?;

    let client_id = cli
        .client_id
        .clone()
        .or_else(|| config.client_id.clone())
        .unwrap_or_default();
    let auth: Arc<dyn Authenticator> = Arc::new(ClientIdAuth::new(client_id)?);
    let timeout = cli
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.timeout());
    let transport: Arc<dyn Transport> =
        Arc::new(HttpTransport::with_settings(&config.api_url, timeout, auth)?);

    let show_progress = !cli.quiet && std::io::stderr().is_terminal();

    let spinner = Spinner::new(&spinner_message(&invocation.command), show_progress);
    let photos = match run_command(&transport, &invocation.command).await {
        Ok(photos) => {
            spinner.finish_with_success(&format!("Found {} photos", photos.len()));
            photos
        }
        Err(e) => {
            spinner.clear();
            return Err(e.into());
        }
    };

    if photos.is_empty() && !cli.quiet {
        ui::print_status(Status::Warning, "No photos found");
    }

    ui::output_photos(&photos, cli.output)?;

    if let Some(step) = &invocation.post_processing {
        post_process(step, transport.as_ref(), &photos, cli, show_progress).await?;
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::print_status(Status::Error, &format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}
