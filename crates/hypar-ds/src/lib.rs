//! Data structures backing the multilevel partitioning engine: the dynamic
//! hypergraph with reversible contractions, sparse integer sets and the
//! addressable gain queue used by FM refinement.

pub mod gain_queue;
pub mod hypergraph;
pub mod memento;
pub mod sparse;

pub use gain_queue::GainQueue;
pub use hypergraph::{Hypergraph, MoveDelta};
pub use memento::{ContractionMemento, Fixup};
pub use sparse::{InsertOnlySparseSet, SparseSet};
