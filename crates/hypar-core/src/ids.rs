//! Identifier and weight types used throughout the engine.
//!
//! Hypernodes and hyperedges are dense 0-based indices; the hot loops index
//! flat arrays with them, so these stay plain integer aliases rather than
//! newtypes.

/// Index of a hypernode within a hypergraph.
pub type HypernodeId = u32;

/// Index of a hyperedge within a hypergraph.
pub type HyperedgeId = u32;

/// Block identifier within a k-way partition.
pub type PartitionId = i32;

/// Weight of a hypernode.
pub type HypernodeWeight = i64;

/// Weight of a hyperedge.
pub type HyperedgeWeight = i64;

/// Block value of a hypernode that has not been assigned yet, and of a free
/// (non-fixed) vertex in a fixed-vertex table.
pub const UNASSIGNED: PartitionId = -1;

/// Sentinel hypernode identifier.
pub const INVALID_HYPERNODE: HypernodeId = HypernodeId::MAX;

/// Sentinel hyperedge identifier.
pub const INVALID_HYPEREDGE: HyperedgeId = HyperedgeId::MAX;
