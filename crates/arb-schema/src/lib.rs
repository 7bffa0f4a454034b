//! # arb-schema: Schema Compiler
//!
//! Compiles a declarative type schema into immutable [`ClassDescriptor`]s.
//!
//! ## Pipeline
//!
//! ```text
//! JSON / YAML ──▶ SchemaDocument ──▶ TypeResolver ──▶ SchemaCompiler ──▶ Vec<ClassDescriptor>
//!                  (document)          (resolve)        (compile)          (descriptor)
//! ```
//!
//! Descriptors are the intermediate representation handed to a
//! [`ClassEmitter`] and to the runtime class registry in `arb-runtime`.
//!
//! ## Schema Shape
//!
//! ```json
//! {
//!     "_meta": { "namespace": "search.query" },
//!     "field": { "operator": "internal:string", "lenient": "internal:boolean" },
//!     "match": { "var": "field", "_any": "array[field]" },
//!     "example_type": { "_parent": "match", "text": "internal:string" }
//! }
//! ```
//!
//! ## Crate Policy
//!
//! - Depends only on `arb-core` internally.
//! - Compilation is pure: no I/O outside [`document::load_schema_file`] and
//!   [`CompileOptions::load`].
//! - A schema either compiles completely or fails with the first
//!   [`SchemaError`]; partial descriptor lists are never returned.

pub mod compile;
pub mod config;
pub mod descriptor;
pub mod document;
pub mod emit;
pub mod error;
pub mod resolve;

pub use compile::{compile, SchemaCompiler};
pub use config::CompileOptions;
pub use descriptor::{AccessorIntent, AccessorKind, ClassDescriptor};
pub use document::{load_schema_file, SchemaDocument, TypeDefinition};
pub use emit::{emit_all, ClassEmitter, ManifestEmitter};
pub use error::SchemaError;
pub use resolve::TypeResolver;
