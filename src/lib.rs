//! KCQL - Kafka Connect Query Language
//!
//! This is the root workspace crate that provides integration tests.
//! The implementation lives in the workspace member crates.

// Re-export main crates for convenience
pub use kcql_ast as ast;
pub use kcql_lexer as lexer;
pub use kcql_mapper as mapper;
pub use kcql_parser as parser;

pub use kcql_ast::Query;
pub use kcql_parser::{parse, KcqlError};
