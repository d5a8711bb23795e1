#![deny(missing_docs)]

//! # oasgen CLI
//!
//! Generates serde models and `reqwest` clients from an OpenAPI document.
//!
//! ```text
//! oasgen openapi.yaml --output-dir src/generated
//! ```
//!
//! Logging goes to stderr and is filtered by `RUST_LOG` (default `oasgen=info`).

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod error;
mod generate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI to Rust models and clients")]
struct Cli {
    #[clap(flatten)]
    generate: generate::GenerateArgs,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("oasgen=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging();
    generate::execute(&cli.generate)?;
    Ok(())
}
