//! The file protocol spoken by `sbtest` (and by the in-process enumerator):
//! an edge file going in, a biclique file and a size file coming out.

pub const DEFAULT_EXECUTABLE: &str = "./sbtest";

pub mod biclique;
pub mod edge_reader;
pub mod edge_writer;
pub mod graph;

pub use biclique::{Biclique, BicliqueList};
