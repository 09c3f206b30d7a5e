//! Command line interface

use std::path::PathBuf;

use clap::Parser;

use crate::emitter::{emit_aag, validate_or_identity};
use crate::features::extract_features;
use crate::index::CircuitIndex;
use crate::io::copy_file;
use crate::ordering::{compute_order, Algorithm};
use crate::support::SupportAnalyzer;

const DEFAULT_ALGORITHM: &str = "mincut";

/// Reorder the primary inputs of an AIGER ASCII circuit
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub args: ReorderArgs,
}

impl Cli {
    /// Run the reordering pipeline. Returns the process exit code.
    pub fn run(&self) -> i32 {
        self.args.run()
    }
}

/// Arguments for the single `aagord` operation: reorder one AAG file.
#[derive(clap::Args)]
pub struct ReorderArgs {
    /// Input AAG file
    pub input: PathBuf,

    /// Output AAG file
    pub output: PathBuf,

    /// Ordering algorithm: sift, window, interleave, quant, dfs, mincut,
    /// lifetime, cofactor, hybrid, rcm
    #[arg(short = 'a', long, default_value = DEFAULT_ALGORITHM)]
    pub algorithm: String,
}

impl ReorderArgs {
    /// Run the reordering pipeline. Returns the process exit code.
    pub fn run(&self) -> i32 {
        let text = match std::fs::read_to_string(&self.input) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("error: could not read {}: {e}", self.input.display());
                return 1;
            }
        };

        let record = match crate::io::parse_aag(&text) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: {e}");
                return 1;
            }
        };

        if record.num_inputs() == 0 {
            copy_file(&self.input, &self.output);
            return 0;
        }

        let algorithm = resolve_algorithm(&self.algorithm);

        let index = CircuitIndex::build(&record);
        let mut support = SupportAnalyzer::new(&index);
        let features = extract_features(&record, &index, &mut support);

        let raw_order = compute_order(algorithm, &record, &index, &mut support, &features);
        let order = validate_or_identity(raw_order, record.num_inputs());

        let out_text = emit_aag(&record, &order);
        if let Err(e) = std::fs::write(&self.output, out_text) {
            eprintln!("error: could not write {}: {e}", self.output.display());
            return 1;
        }
        0
    }
}

/// Parse `name` into a known [`Algorithm`], falling back to the
/// documented default and printing a diagnostic when it is unrecognized.
fn resolve_algorithm(name: &str) -> Algorithm {
    match Algorithm::parse(name) {
        Some(algo) => algo,
        None => {
            let fallback = Algorithm::parse(DEFAULT_ALGORITHM).expect("default algorithm name is valid");
            eprintln!(
                "warning: unknown algorithm '{name}', falling back to '{}'",
                fallback.name()
            );
            fallback
        }
    }
}

/// Run the reordering pipeline over in-memory text, for tests that want
/// the full pipeline without touching the filesystem.
#[cfg(test)]
fn reorder_text(text: &str, algorithm: &str) -> Result<String, crate::error::AagError> {
    let record = crate::io::parse_aag(text)?;
    if record.num_inputs() == 0 {
        return Ok(text.to_string());
    }
    let algo = resolve_algorithm(algorithm);
    let index = CircuitIndex::build(&record);
    let mut support = SupportAnalyzer::new(&index);
    let features = extract_features(&record, &index, &mut support);
    let raw_order = compute_order(algo, &record, &index, &mut support, &features);
    let order = validate_or_identity(raw_order, record.num_inputs());
    Ok(emit_aag(&record, &order))
}
