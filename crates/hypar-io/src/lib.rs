//! File IO for the partitioner: hMetis hypergraph files, fixed-vertex
//! files and partition output.

pub mod fixed;
pub mod hmetis;

pub use fixed::{apply_fixed_vertices, read_fixed_vertex_file};
pub use hmetis::{read_hypergraph_file, write_partition_file};
