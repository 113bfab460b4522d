//! CLI for LogoForge - AI logo concept and image generation.

use clap::{Args, Parser, Subcommand};
use logoforge::concept::providers::GeminiConceptProvider;
use logoforge::concept::{ConceptProvider, ConceptRequest};
use logoforge::image::providers::GeminiImageProvider;
use logoforge::image::{LogoImageProvider, LogoImageRequest};
use logoforge::quota::{FileStore, QuotaTracker, SystemClock, DEFAULT_DAILY_LIMIT};
use logoforge::LogoForgeError;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logoforge")]
#[command(about = "Generate logo concepts and images via the Gemini API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a logo concept from a brand description
    Concept(ConceptArgs),

    /// Generate a logo image (concept first, then render)
    Logo(LogoArgs),

    /// Show today's generation quota
    Usage,

    /// Run the HTTP proxy for browser clients
    Serve(ServeArgs),
}

#[derive(Args)]
struct ConceptArgs {
    /// Short description of the brand or product
    description: String,

    /// Style direction (e.g. "minimalist", "vintage")
    #[arg(short, long)]
    style: Option<String>,
}

#[derive(Args)]
struct LogoArgs {
    /// Short description of the brand or product
    description: String,

    /// Style direction (e.g. "minimalist", "vintage")
    #[arg(short, long)]
    style: Option<String>,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1:8787")]
    addr: std::net::SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logoforge=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Concept(args) => {
            generate_concept(args, cli.json).await?;
        }
        Commands::Logo(args) => {
            generate_logo(args, cli.json).await?;
        }
        Commands::Usage => {
            show_usage(cli.json)?;
        }
        Commands::Serve(args) => {
            run_proxy(args).await?;
        }
    }

    Ok(())
}

fn usage_tracker() -> QuotaTracker<FileStore, SystemClock> {
    let dir = dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("logoforge");
    let limit = std::env::var("LOGOFORGE_DAILY_LIMIT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_DAILY_LIMIT);
    QuotaTracker::file_backed(dir, limit)
}

async fn generate_concept(args: ConceptArgs, json_output: bool) -> anyhow::Result<()> {
    let tracker = usage_tracker();
    if !tracker.try_reserve() {
        anyhow::bail!("{}", LogoForgeError::DailyLimitReached);
    }

    let result = write_concept(&args.description, args.style.as_deref()).await;
    let concept = match result {
        Ok(concept) => concept,
        Err(e) => {
            // The attempt did not produce anything; give the quota back.
            tracker.rollback();
            return Err(e.into());
        }
    };

    if json_output {
        let result = serde_json::json!({
            "type": "concept",
            "success": true,
            "text": concept.text,
            "model": concept.metadata.model,
            "duration_ms": concept.metadata.duration_ms,
            "remaining_today": tracker.remaining(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", concept.text);
        println!("\n({} generations left today)", tracker.remaining());
    }

    Ok(())
}

async fn generate_logo(args: LogoArgs, json_output: bool) -> anyhow::Result<()> {
    let tracker = usage_tracker();
    if !tracker.try_reserve() {
        anyhow::bail!("{}", LogoForgeError::DailyLimitReached);
    }

    let result = render_logo(&args.description, args.style.as_deref()).await;
    let logo = match result {
        Ok(logo) => logo,
        Err(e) => {
            tracker.rollback();
            return Err(e.into());
        }
    };

    logo.save(&args.output)?;

    if json_output {
        let result = serde_json::json!({
            "type": "logo",
            "success": true,
            "output": args.output.display().to_string(),
            "size_bytes": logo.size(),
            "format": logo.format.extension(),
            "model": logo.metadata.model,
            "duration_ms": logo.metadata.duration_ms,
            "remaining_today": tracker.remaining(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Generated logo: {} ({} bytes)",
            args.output.display(),
            logo.size()
        );
        println!("({} generations left today)", tracker.remaining());
    }

    Ok(())
}

async fn write_concept(
    description: &str,
    style: Option<&str>,
) -> logoforge::Result<logoforge::concept::LogoConcept> {
    let provider = GeminiConceptProvider::builder().build()?;
    let mut request = ConceptRequest::new(description);
    if let Some(style) = style {
        request = request.with_style(style);
    }
    provider.generate(&request).await
}

async fn render_logo(
    description: &str,
    style: Option<&str>,
) -> logoforge::Result<logoforge::image::GeneratedLogo> {
    let concept = write_concept(description, style).await?;
    let provider = GeminiImageProvider::builder().build()?;
    provider.generate(&LogoImageRequest::new(concept.text)).await
}

fn show_usage(json_output: bool) -> anyhow::Result<()> {
    let tracker = usage_tracker();

    if json_output {
        let result = serde_json::json!({
            "used_today": tracker.current_count(),
            "remaining_today": tracker.remaining(),
            "daily_limit": tracker.daily_limit(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Used {} of {} generations today ({} remaining)",
            tracker.current_count(),
            tracker.daily_limit(),
            tracker.remaining()
        );
    }

    Ok(())
}

async fn run_proxy(args: ServeArgs) -> anyhow::Result<()> {
    let provider = GeminiImageProvider::builder().build()?;
    let state = logoforge::server::AppState::new(std::sync::Arc::new(provider));
    logoforge::server::serve(args.addr, state).await?;
    Ok(())
}
