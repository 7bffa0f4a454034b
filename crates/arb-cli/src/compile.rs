//! # Compile Subcommand
//!
//! `arb compile <schema>` compiles a schema and renders every class through
//! the manifest emitter. Manifests go to stdout as one JSON array, or with
//! `--out-dir` into one `<ClassName>.json` file per class.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use arb_schema::{emit_all, CompileOptions, ManifestEmitter, SchemaCompiler};
use clap::Args;
use serde_json::Value;

/// Arguments for the compile subcommand.
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Schema file (.json, .yaml or .yml).
    pub schema: PathBuf,

    /// Render types in documentation mode (`Field[]` instead of `array`).
    #[arg(long)]
    pub docs: bool,

    /// Write one manifest file per class into this existing directory.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

/// Execute the compile subcommand.
pub fn run_compile(args: &CompileArgs, mut options: CompileOptions) -> Result<u8> {
    options.docs |= args.docs;
    let manifests = compile_manifests(&args.schema, options)?;

    match &args.out_dir {
        Some(dir) => {
            let written = write_manifests(dir, &manifests)?;
            println!("Wrote {} manifests to {}", written.len(), dir.display());
        }
        None => {
            let all: Vec<Value> = manifests.into_iter().map(|(_, m)| m).collect();
            println!("{}", serde_json::to_string_pretty(&all)?);
        }
    }
    Ok(0)
}

/// Compile `schema` and return `(class name, manifest)` pairs in schema
/// order.
pub fn compile_manifests(schema: &Path, options: CompileOptions) -> Result<Vec<(String, Value)>> {
    let value = crate::read_schema(schema)?;
    let compiler = SchemaCompiler::new(options);
    let descriptors = compiler
        .compile_value(&value)
        .with_context(|| format!("failed to compile schema: {}", schema.display()))?;
    let manifests = emit_all(&mut ManifestEmitter::new(compiler.options().docs), &descriptors)?;

    Ok(descriptors
        .iter()
        .map(|d| d.class_name())
        .zip(manifests)
        .collect())
}

fn write_manifests(dir: &Path, manifests: &[(String, Value)]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("output directory does not exist: {}", dir.display());
    }
    let mut written = Vec::with_capacity(manifests.len());
    for (class, manifest) in manifests {
        let path = dir.join(format!("{class}.json"));
        let content = serde_json::to_string_pretty(manifest)?;
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write manifest: {}", path.display()))?;
        tracing::info!(class = %class, path = %path.display(), "wrote manifest");
        written.push(path);
    }
    Ok(written)
}
