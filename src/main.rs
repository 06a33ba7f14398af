use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sage_scope::client::BackendClient;
use sage_scope::config::Config;
use sage_scope::models::{is_usable_rate, InputsPatch, PocFocus};
use sage_scope::pipeline::Pipeline;
use sage_scope::wizard::{StageBackend, Wizard, WizardState};
use sage_scope::{api, report};

#[derive(Parser)]
#[command(name = "sage")]
#[command(about = "AI-assisted software project scoping")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP backend
    Serve {
        /// Interface to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for HTTP API
        #[arg(short, long, env = "PORT", default_value = "3001")]
        port: u16,
    },
    /// Run the whole wizard for one project and print the report
    Scope {
        /// Transcript text file
        #[arg(short, long)]
        transcript: PathBuf,

        /// USD per hour used for cost estimates
        #[arg(long)]
        hourly_rate: f64,

        /// PDF documents to attach (repeatable)
        #[arg(long = "pdf")]
        pdfs: Vec<PathBuf>,

        /// POC to expand into the MVP plan (revenue, fundraising, risk-mitigation)
        #[arg(long, value_parser = parse_focus)]
        focus: Option<PocFocus>,

        /// Use a running backend instead of calling the provider in-process
        #[arg(long, env = "SAGE_BACKEND_URL")]
        backend: Option<String>,

        /// Print the final wizard state as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_focus(s: &str) -> Result<PocFocus, String> {
    PocFocus::from_str(s)
        .ok_or_else(|| format!("expected revenue, fundraising, or risk-mitigation, got {s}"))
}

/// Initialize tracing with output to stderr (for report output) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "sage_scope=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Scope mode: stdout carries only the report
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = matches!(cli.command, Some(Commands::Scope { .. }));
    init_tracing(use_stderr);

    match cli.command {
        Some(Commands::Serve { host, port }) => serve(&host, port).await,
        Some(Commands::Scope {
            transcript,
            hourly_rate,
            pdfs,
            focus,
            backend,
            json,
        }) => {
            if !is_usable_rate(Some(hourly_rate)) {
                bail!("--hourly-rate must be a positive number");
            }
            let transcript = tokio::fs::read_to_string(&transcript)
                .await
                .with_context(|| format!("Failed to read transcript {}", transcript.display()))?;
            if transcript.trim().is_empty() {
                bail!("Transcript is empty");
            }
            let mut pdf_files = Vec::with_capacity(pdfs.len());
            for path in &pdfs {
                let bytes = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                pdf_files.push(bytes);
            }

            let patch = InputsPatch {
                hourly_rate: Some(hourly_rate),
                transcript: Some(transcript),
                pdf_files: Some(pdf_files),
            };

            let state = match backend {
                Some(url) => {
                    tracing::info!("Scoping against backend at {}", url);
                    drive(BackendClient::new(url), patch, focus).await?
                }
                None => {
                    let config = Config::from_env();
                    warn_if_unconfigured(&config);
                    drive(Pipeline::from_config(&config)?, patch, focus).await?
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                print!("{}", report::render(&state));
            }
            Ok(())
        }
        // Default: start server
        None => {
            let port = std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001);
            serve("127.0.0.1", port).await
        }
    }
}

async fn serve(host: &str, port: u16) -> anyhow::Result<()> {
    let config = Config::from_env();
    warn_if_unconfigured(&config);

    let pipeline = Pipeline::from_config(&config)?;
    let app = api::create_router(pipeline, config.cors_origins.as_deref());

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("sage backend listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}

fn warn_if_unconfigured(config: &Config) {
    if config.api_key.is_none() {
        tracing::warn!(
            "OpenRouter API key not found. Set OPENROUTER_API_KEY environment variable."
        );
    }
}

async fn drive<B: StageBackend>(
    backend: B,
    patch: InputsPatch,
    focus: Option<PocFocus>,
) -> anyhow::Result<WizardState> {
    let mut wizard = Wizard::new(backend);
    wizard.update_inputs(patch)?;
    wizard.run_through(focus).await?;
    Ok(wizard.into_state())
}
