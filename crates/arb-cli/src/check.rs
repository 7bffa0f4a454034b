//! # Check Subcommand
//!
//! `arb check <schema>` compiles a schema and links the result into a
//! runtime class registry, so both compile errors and linking errors
//! surface. Exits 1 on failure.

use std::path::PathBuf;

use anyhow::Result;
use arb_runtime::ClassRegistry;
use arb_schema::{CompileOptions, SchemaCompiler};
use clap::Args;

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema file (.json, .yaml or .yml).
    pub schema: PathBuf,
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs, options: CompileOptions) -> Result<u8> {
    let value = crate::read_schema(&args.schema)?;
    let compiler = SchemaCompiler::new(options);

    match ClassRegistry::from_schema(&compiler, &value) {
        Ok(registry) => {
            println!("OK: {} ({} classes)", args.schema.display(), registry.len());
            for class in registry.classes() {
                let mode = if class.is_open() { "open" } else { "closed" };
                println!(
                    "  {:<32} {:>3} properties  {mode}",
                    class.qualified_name(),
                    class.properties().len()
                );
            }
            Ok(0)
        }
        Err(e) => {
            println!("FAIL: {}: {e}", args.schema.display());
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(content: &str) -> u8 {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.yaml");
        std::fs::write(&path, content).unwrap();
        run_check(&CheckArgs { schema: path }, CompileOptions::default()).unwrap()
    }

    #[test]
    fn valid_schema_passes() {
        assert_eq!(
            check("field:\n  operator: internal:string\nmatch:\n  _any: array[field]\n"),
            0
        );
    }

    #[test]
    fn unknown_type_fails() {
        assert_eq!(check("t:\n  f: nonexistent_type\n"), 1);
    }

    #[test]
    fn cycle_fails() {
        assert_eq!(check("a:\n  _parent: b\nb:\n  _parent: a\n"), 1);
    }

    #[test]
    fn unreadable_schema_is_an_error() {
        let args = CheckArgs {
            schema: PathBuf::from("/nonexistent/schema.json"),
        };
        assert!(run_check(&args, CompileOptions::default()).is_err());
    }
}
