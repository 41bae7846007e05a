//! KCQL Mapper - Statements in bulk
//!
//! A connector is configured with several statements at once. This crate
//! splits the configured text, parses each statement, and checks that no
//! source or target is mapped twice. Splitting and name checks are policies
//! supplied by the caller.

mod mapper;
mod policy;
mod split;

pub use mapper::*;
pub use policy::*;
pub use split::*;
