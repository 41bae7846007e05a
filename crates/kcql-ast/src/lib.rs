//! KCQL AST - Syntax tree and semantic model
//!
//! This crate defines spans for source locations, the syntax tree the
//! grammar produces, the closed vocabularies used by clauses, and the
//! [`Query`] model handed to connectors.

mod span;
mod syntax;
mod types;
mod query;

pub use span::*;
pub use syntax::*;
pub use types::*;
pub use query::*;
