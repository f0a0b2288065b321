//! Re-encodes a similarity matrix artifact as gzip-compressed JSON.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_recommender::services::loader;

#[derive(Debug, Parser)]
#[command(name = "compress-similarity", about = "Compress a similarity matrix artifact")]
struct Args {
    /// Source matrix, plain or already compressed JSON
    #[arg(default_value = "similarity.json")]
    input: PathBuf,

    /// Destination for the compressed matrix
    #[arg(default_value = "similarity.json.gz")]
    output: PathBuf,

    /// Gzip level, 0-9
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(0..=9))]
    level: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let matrix = loader::load_similarity(&args.input)?;
    let written = loader::write_similarity_compressed(&matrix, &args.output, args.level)?;

    tracing::info!(
        input = %args.input.display(),
        output = %args.output.display(),
        rows = matrix.size(),
        bytes = written,
        level = args.level,
        "Compression complete"
    );

    Ok(())
}
