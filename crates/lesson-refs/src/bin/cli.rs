//! Command-line reference ingestion
//!
//! Run with: cargo run -p lesson-refs --features cli --bin lesson-refs-cli -- a.pdf b.pdf

use clap::Parser;
use lesson_refs::{config::RefsConfig, ReferencePipeline};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "lesson-refs-cli", version, about = "Extract bounded reference text from lesson PDFs")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the full tagged report as JSON
    #[arg(long, conflicts_with = "context")]
    json: bool,

    /// Print only the joined prompt context
    #[arg(long)]
    context: bool,

    /// Override the number of files processed
    #[arg(long)]
    max_files: Option<usize>,

    /// Override the aggregate character budget
    #[arg(long)]
    max_chars: Option<usize>,

    /// Reference files, processed in order
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lesson_refs=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = RefsConfig::load(args.config.as_deref())?;
    if let Some(max_files) = args.max_files {
        config.ingestion.max_files = max_files;
    }
    if let Some(max_chars) = args.max_chars {
        config.ingestion.max_chars = max_chars;
    }
    config.validate()?;

    let pipeline = ReferencePipeline::new(&config);
    let context = pipeline.process_files(&args.paths);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&context)?);
    } else if args.context {
        println!("{}", context.prompt_context());
    } else {
        for entry in &context.entries {
            if let Some(value) = entry.outcome.legacy_value() {
                println!("{}: {}", entry.path, value);
            }
        }
        for path in &context.ignored {
            eprintln!("ignored (file limit): {}", path);
        }
        for entry in context.entries.iter().filter(|e| e.outcome.text().is_none()) {
            eprintln!("{}: {}", entry.outcome.label(), entry.path);
        }
    }

    Ok(())
}
