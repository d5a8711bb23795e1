#![deny(missing_docs)]

//! # Generate Command
//!
//! Reads an OpenAPI document, runs the generator and writes the units to disk:
//!
//! ```text
//! <output-dir>/
//!   mod.rs          pub mod api; pub mod models;
//!   models/mod.rs   one `pub mod` per model unit
//!   models/*.rs
//!   api/mod.rs      one `pub mod` per client unit
//!   api/*.rs
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use oasgen_core::oas::naming::module_stems;
use oasgen_core::{generate_from_str, generate_module_index, GenerationOutput, GeneratorConfig};
use tracing::{info, warn};

use crate::error::{CliError, CliResult};

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to the OpenAPI document (JSON or YAML).
    #[clap(value_name = "OPENAPI")]
    pub openapi_path: PathBuf,

    /// Directory receiving `models/` and `api/`.
    #[clap(long, default_value = "code", env = "OASGEN_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Prefix units with comments describing their schema or operation.
    #[clap(long)]
    pub emit_metadata: bool,

    /// Skip parsing the generated sources.
    #[clap(long)]
    pub no_verify: bool,
}

impl GenerateArgs {
    /// The generator options selected by the flags.
    pub fn config(&self) -> GeneratorConfig {
        GeneratorConfig {
            emit_metadata: self.emit_metadata,
            verify_syntax: !self.no_verify,
            ..GeneratorConfig::default()
        }
    }
}

/// Executes the generation and returns the written files.
pub fn execute(args: &GenerateArgs) -> CliResult<Vec<PathBuf>> {
    if !args.openapi_path.exists() {
        return Err(CliError::General(format!(
            "OpenAPI file not found: {:?}",
            args.openapi_path
        )));
    }

    let text = fs::read_to_string(&args.openapi_path)?;
    let output = generate_from_str(&text, &args.config())?;
    for issue in &output.issues {
        warn!(%issue, "skipped during generation");
    }

    let written = write_output(&output, &args.output_dir)?;
    info!(
        files = written.len(),
        skipped = output.issues.len(),
        output_dir = %args.output_dir.display(),
        "sources written"
    );
    Ok(written)
}

/// Writes models, clients and their module indexes under `dir`.
pub fn write_output(output: &GenerationOutput, dir: &Path) -> CliResult<Vec<PathBuf>> {
    let mut written = Vec::new();
    written.extend(write_units(&output.models, &dir.join("models"))?);
    written.extend(write_units(&output.clients, &dir.join("api"))?);

    let root = dir.join("mod.rs");
    fs::write(&root, "pub mod api;\npub mod models;\n")?;
    written.push(root);
    Ok(written)
}

fn write_units(units: &IndexMap<String, String>, dir: &Path) -> CliResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let stems = module_stems(units.keys().map(String::as_str));
    let mut written = Vec::with_capacity(units.len() + 1);
    for (name, code) in units {
        let Some(stem) = stems.get(name) else {
            continue;
        };
        let path = dir.join(format!("{}.rs", stem));
        fs::write(&path, code)?;
        written.push(path);
    }
    let index = dir.join("mod.rs");
    fs::write(&index, generate_module_index(stems.values().map(String::as_str)))?;
    written.push(index);
    Ok(written)
}
