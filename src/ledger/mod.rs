//! Ledger module: header location, normalization and the interest pipeline

pub mod core;
pub mod header;
pub mod normalizer;

pub use self::core::*;
pub use header::*;
pub use normalizer::*;
