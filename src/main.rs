//! pbstream CLI
//!
//! Transcode protobuf records between wire format and JSON on stdin/stdout.

use anyhow::{Context, Result};
use clap::Parser;
use pbstream::{
    transcode, Config, Direction, FramingMode, Resolver, SearchPath, Sources,
    DEFAULT_MAX_RECORD_KIB,
};
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pbstream")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Transcode protobuf records between wire format and JSON", long_about = None)]
struct Cli {
    /// Decode wire format to JSON instead of encoding JSON
    #[arg(short, long)]
    decode: bool,

    /// Length delimited (varint) framing
    #[arg(short = 'l', long)]
    delimited: bool,

    /// Max message size (in KiB)
    #[arg(short, long = "max-size", default_value_t = DEFAULT_MAX_RECORD_KIB)]
    max_size: usize,

    /// Print status messages
    #[arg(short, long)]
    verbose: bool,

    /// Extra include directory for sources and imports (repeatable)
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    include: Vec<PathBuf>,

    /// Fully-qualified message type name
    #[arg(value_name = "TYPE")]
    type_name: String,

    /// .proto sources; when omitted the source is derived from the package
    #[arg(value_name = "SOURCE")]
    sources: Vec<PathBuf>,
}

impl Cli {
    fn config(&self) -> Config {
        let direction = if self.decode {
            Direction::Decode
        } else {
            Direction::Encode
        };
        let framing = if self.delimited {
            FramingMode::Delimited
        } else {
            FramingMode::WholeStream
        };
        Config::new(direction, framing)
            .with_max_record_kib(self.max_size)
            .with_verbose(self.verbose)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config();

    // Logs go to stderr; stdout carries the data stream.
    let filter = if config.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let mut search_path = SearchPath::from_env();
    search_path.prepend(cli.include.iter().cloned());
    debug!(dirs = ?search_path.dirs(), "search path");

    let sources = Sources::from_paths(cli.sources.iter().cloned());
    let descriptor = Resolver::new(search_path)
        .resolve(&sources, &cli.type_name)
        .with_context(|| format!("resolving message type {}", cli.type_name))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    transcode(
        &config,
        descriptor,
        BufReader::new(stdin.lock()),
        BufWriter::new(stdout.lock()),
    )
    .with_context(|| format!("transcoding {}", cli.type_name))?;
    Ok(())
}
