//! # arb-core: Foundational Types for arraybuilder
//!
//! This crate is the leaf of the arraybuilder workspace. It defines the
//! vocabulary shared by the schema compiler (`arb-schema`) and the runtime
//! property store (`arb-runtime`).
//!
//! ## Key Design Principles
//!
//! 1. **Validated identifiers.** Schema type and property names are
//!    [`SnakeIdent`] newtypes. The only constructor validates the
//!    snake_case shape, which is what makes `decamelize(camelize(x)) == x`
//!    hold for every name that reaches an accessor.
//!
//! 2. **One type vocabulary.** [`ResolvedType`] is the single definition of
//!    what a property may hold. The compiler produces it, the descriptor
//!    stores it, the store validates against it.
//!
//! 3. **Pure naming transforms.** [`naming`] has no state and no
//!    configuration beyond the glue string.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `arb-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod naming;
pub mod types;

pub use error::IdentifierError;
pub use naming::{camel_case, decamelize, join_words, pascal_case, SnakeIdent};
pub use types::{PrimitiveKind, ResolvedType, TypeRef};
