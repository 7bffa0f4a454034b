//! # arb-runtime: Runtime Property Store
//!
//! Enforces a compiled schema's accessor contracts at call time, with no
//! per-class generated code.
//!
//! ```text
//! Vec<ClassDescriptor> ──▶ ClassRegistry ──▶ Arc<Class> ──create()──▶ Instance
//!                          (link parents)    (dispatch table)         (data bag)
//! ```
//!
//! - [`ClassRegistry`] links descriptors to their ancestors and hands out
//!   instances by schema name.
//! - [`Instance`] validates every read and write against its class, stores
//!   values in an insertion-ordered [`Collection`], and renders recursively
//!   with [`Instance::to_array`] or through `serde`.
//! - [`Instance::call`] turns `setX` / `getX` / `addX` / `appendX` names into
//!   store operations.
//!
//! ## Example
//!
//! ```
//! use arb_runtime::{Args, ClassRegistry};
//! use arb_schema::SchemaCompiler;
//! use serde_json::json;
//!
//! let registry = ClassRegistry::from_schema(
//!     &SchemaCompiler::default(),
//!     &json!({
//!         "field": { "operator": "internal:string" },
//!         "match": { "_any": "array[field]" }
//!     }),
//! )?;
//!
//! let mut field = registry.create("field")?;
//! field.call("setOperator", Args::value("and"))?;
//!
//! let mut m = registry.create("match")?;
//! m.call("appendField", Args::value(field))?;
//! assert_eq!(m.to_array(), json!([{ "operator": "and" }]));
//! # Ok::<(), arb_runtime::StoreError>(())
//! ```
//!
//! Classes are immutable once linked and shared through `Arc`; instances
//! are plain owned values.

pub mod class;
pub mod error;
pub mod instance;
pub mod value;

pub use class::{Accessor, Class, ClassRegistry};
pub use error::StoreError;
pub use instance::{Args, Instance};
pub use value::{Collection, Key, Value};
