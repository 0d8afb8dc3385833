//! Fixed-vertex files: one line per vertex holding its pre-assigned block
//! or -1 for a free vertex.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use hypar_core::{ErrorInfo, HyparError, HypernodeId, PartitionId, UNASSIGNED};
use hypar_ds::Hypergraph;

/// Reads and validates a fixed-vertex file for `num_nodes` vertices and
/// `k` blocks.
pub fn read_fixed_vertex_file(
    path: &Path,
    num_nodes: usize,
    k: usize,
) -> Result<Vec<PartitionId>, HyparError> {
    let file = File::open(path).map_err(|err| {
        HyparError::Input(
            ErrorInfo::new("unreadable-fixed-file", "cannot open fixed-vertex file")
                .with_context("path", path.display())
                .with_context("cause", err),
        )
    })?;
    let reader = BufReader::new(file);

    let mut assignments = Vec::with_capacity(num_nodes);
    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| {
            HyparError::Input(
                ErrorInfo::new("unreadable-fixed-file", "cannot read fixed-vertex file")
                    .with_context("line", number + 1)
                    .with_context("cause", err),
            )
        })?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('%') {
            continue;
        }
        let block: PartitionId = text.parse().map_err(|_| {
            HyparError::Input(
                ErrorInfo::new("bad-fixed-entry", "cannot parse fixed-vertex entry")
                    .with_context("line", number + 1)
                    .with_context("token", text),
            )
        })?;
        if block != UNASSIGNED && !(0..k as PartitionId).contains(&block) {
            return Err(HyparError::Input(
                ErrorInfo::new("fixed-block-out-of-range", "fixed block outside 0..k")
                    .with_context("line", number + 1)
                    .with_context("block", block)
                    .with_context("k", k),
            ));
        }
        assignments.push(block);
    }

    if assignments.len() != num_nodes {
        return Err(HyparError::Input(
            ErrorInfo::new(
                "fixed-file-length-mismatch",
                "fixed-vertex file must hold one line per vertex",
            )
            .with_context("expected", num_nodes)
            .with_context("actual", assignments.len()),
        ));
    }
    Ok(assignments)
}

/// Applies a fixed-vertex table to the hypergraph.
pub fn apply_fixed_vertices(hg: &mut Hypergraph, assignments: &[PartitionId]) {
    debug_assert_eq!(assignments.len(), hg.initial_num_nodes());
    for (v, &block) in assignments.iter().enumerate() {
        if block != UNASSIGNED {
            hg.set_fixed(v as HypernodeId, block);
        }
    }
}
