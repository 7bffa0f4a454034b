//! # arb-cli: Command-Line Interface for arraybuilder
//!
//! Provides the `arb` binary.
//!
//! ## Subcommands
//!
//! - `arb compile`: compile a schema and print one manifest per class, or
//!   write them into a directory.
//! - `arb check`: compile a schema, link its classes, and report.
//!
//! ```bash
//! arb compile query.json --docs
//! arb compile query.yaml --out-dir build/manifests
//! arb -v --config arb.yaml check query.json
//! ```

pub mod check;
pub mod compile;

use std::path::Path;

use anyhow::{Context, Result};
use arb_schema::{load_schema_file, CompileOptions};

/// Load compile options from `--config`, or defaults when not given.
pub fn load_options(config: Option<&Path>) -> Result<CompileOptions> {
    match config {
        Some(path) => {
            let options = CompileOptions::load(path)
                .with_context(|| format!("failed to load config: {}", path.display()))?;
            tracing::debug!(config = %path.display(), "loaded compile options");
            Ok(options)
        }
        None => Ok(CompileOptions::default()),
    }
}

/// Read a `.json`, `.yaml` or `.yml` schema into a JSON value tree.
pub fn read_schema(path: &Path) -> Result<serde_json::Value> {
    load_schema_file(path).with_context(|| format!("failed to read schema: {}", path.display()))
}
