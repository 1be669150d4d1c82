pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod literal;
pub mod model;
pub mod parser;
pub mod processor;
pub mod writer;

use std::path::PathBuf;

use anyhow::{Context, anyhow, bail};
use clap::Parser;
use tracing::info;

pub use config::ConverterConfig;
pub use error::{GenerateError, GenerateResult};
pub use model::{Diagnostic, ExtensionDescriptor, ExtensionPayload, ParsedCode};
pub use processor::Action;
pub use writer::{Generator, generate};

/// Parse pseudo-code into the intermediate representation. Never fails;
/// problems are listed in `ParsedCode::errors`.
pub fn parse(text: &str) -> ParsedCode {
    processor::parse_pseudo_code(text)
}

pub fn run() -> anyhow::Result<()> {
    run_with(cli::Cli::parse()).map(|_| ())
}

/// Runs one conversion. Returns the archive path, or `None` for `--check`.
pub fn run_with(args: cli::Cli) -> anyhow::Result<Option<PathBuf>> {
    // 1. ── Parse ──────────────────────────────────────────────────────
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Reading {}", args.input.display()))?;
    let ir = if args.ir {
        parser::load_ir_from_json(&text).with_context(|| "Parsing IR document")?
    } else {
        parse(&text)
    };

    if let Some(path) = &args.emit_ir {
        let json = serde_json::to_string_pretty(&ir)?;
        std::fs::write(path, json).with_context(|| format!("Writing {}", path.display()))?;
    }

    for diagnostic in &ir.errors {
        eprintln!("line {}: {}", diagnostic.line, diagnostic.message);
    }
    if ir.has_errors() {
        bail!("{} problem(s) found; no archive written", ir.errors.len());
    }
    if args.check {
        info!(events = ir.events.len(), components = ir.components.len(), "no problems found");
        return Ok(None);
    }

    // 2. ── Configure ──────────────────────────────────────────────────
    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Reading {}", path.display()))?;
            parser::load_config_from_json(&json)
                .with_context(|| format!("Parsing config {}", path.display()))?
        }
        None => ConverterConfig::default(),
    };

    let extensions = args
        .extensions
        .iter()
        .map(|path| {
            ExtensionDescriptor::from_aix_path(path)
                .ok_or_else(|| anyhow!("{} is not an .aix file", path.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    // 3. ── Write archive ──────────────────────────────────────────────
    let bytes = Generator::new(config)
        .generate(&ir, &extensions)
        .with_context(|| "Generating archive")?;

    let output = args.output_path();
    std::fs::write(&output, bytes).with_context(|| format!("Writing {}", output.display()))?;
    info!(path = %output.display(), "wrote project");

    Ok(Some(output))
}
