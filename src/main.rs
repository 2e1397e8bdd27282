//! caligo-convert - CLI to convert delimited geometry CSV files to the
//! CALIGO fixed-column format.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use caligo_convert::{CsvConverter, OutputHeader};

/// Convert delimited geometry CSV files to the CALIGO format.
#[derive(Parser, Debug)]
#[command(name = "caligo-convert")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input CSV file path
    #[arg(short, long)]
    input: PathBuf,

    /// Output file path (defaults to the input path with a .txt extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration document path
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// MAP header value
    #[arg(long, default_value = "")]
    map: String,

    /// MODEL header value
    #[arg(long, default_value = "")]
    model: String,

    /// USER header value
    #[arg(long, default_value = "")]
    user: String,

    /// NAME header value
    #[arg(long, default_value = "")]
    name: String,

    /// Output parsed records as JSON instead of converting
    #[arg(long)]
    debug: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut converter = CsvConverter::new();
    converter
        .load_config(&args.config)
        .with_context(|| format!("failed to load configuration {}", args.config.display()))?;

    converter
        .open_and_parse(&args.input)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;

    // Debug output
    if args.debug {
        let json = serde_json::to_string_pretty(converter.records())?;
        println!("{}", json);
        return Ok(());
    }

    let output_path = args.output.unwrap_or_else(|| {
        let mut path = args.input.clone();
        path.set_extension("txt");
        path
    });

    let header = OutputHeader::new(args.map, args.model, args.user, args.name);
    converter
        .convert(&output_path, &header)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    info!("converted: {}", output_path.display());

    Ok(())
}
