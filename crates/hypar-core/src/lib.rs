#![deny(missing_docs)]
#![doc = "Core types shared by the hypar partitioning engine: identifiers, structured errors, deterministic RNG plumbing and the run configuration."]

pub mod config;
pub mod errors;
pub mod ids;
pub mod rng;

pub use config::{
    CoarseningConfig, InitialAlgorithm, InitialPartitioningConfig, Mode, Objective,
    PartitionConfig, RatingFunction, RefineAlgorithm, RefinementConfig,
};
pub use errors::{ErrorInfo, HyparError};
pub use ids::{
    HyperedgeId, HyperedgeWeight, HypernodeId, HypernodeWeight, PartitionId, INVALID_HYPEREDGE,
    INVALID_HYPERNODE, UNASSIGNED,
};
pub use rng::{derive_substream_seed, RngHandle};
