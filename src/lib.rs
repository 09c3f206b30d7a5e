//! Static input-ordering heuristics for AIGER circuits.
//!
//! Given an AIGER ASCII (AAG) file, this crate computes a permutation of
//! its primary inputs intended to reduce the size and width of a BDD
//! later built from the same circuit, and rewrites the file with that
//! permutation applied to the input-literal block and input symbol
//! annotations. It does not build or evaluate a BDD itself.

pub mod cmd;
pub mod cost;
pub mod emitter;
pub mod error;
pub mod features;
pub mod graph;
pub mod index;
pub mod io;
pub mod literal;
pub mod ordering;
pub mod record;
pub mod support;

pub use error::AagError;
pub use literal::Lit;
pub use ordering::Algorithm;
pub use record::{AagRecord, Header};
