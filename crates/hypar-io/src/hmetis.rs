//! hMetis hypergraph format.
//!
//! Header line: `|E| |V| [fmt]` with fmt in {0, 1, 10, 11}; bit 0 signals
//! hyperedge weights, bit 1 vertex weights. Each of the next |E| lines
//! holds an optional edge weight followed by the 1-based pin ids of one
//! hyperedge; with vertex weights present, |V| weight lines follow. Lines
//! starting with `%` are comments. Pin ids are remapped to 0-based.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use hypar_core::{
    ErrorInfo, HyparError, HyperedgeWeight, HypernodeId, HypernodeWeight, PartitionId,
};
use hypar_ds::Hypergraph;

/// Reads an hMetis file and builds the hypergraph sized for `k` blocks.
pub fn read_hypergraph_file(path: &Path, k: usize) -> Result<Hypergraph, HyparError> {
    let file = File::open(path).map_err(|err| {
        input_error(
            ErrorInfo::new("unreadable-hypergraph-file", "cannot open hypergraph file")
                .with_context("path", path.display())
                .with_context("cause", err),
        )
    })?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines().enumerate().filter_map(|(number, line)| {
        match line {
            Ok(text) => {
                let trimmed = text.trim().to_string();
                if trimmed.is_empty() || trimmed.starts_with('%') {
                    None
                } else {
                    Some(Ok((number + 1, trimmed)))
                }
            }
            Err(err) => Some(Err(input_error(
                ErrorInfo::new("unreadable-hypergraph-file", "cannot read hypergraph file")
                    .with_context("line", number + 1)
                    .with_context("cause", err),
            ))),
        }
    });

    let (header_line, header) = lines.next().ok_or_else(|| {
        input_error(ErrorInfo::new("empty-hypergraph-file", "hypergraph file has no header"))
    })??;
    let mut fields = header.split_whitespace();
    let num_edges: usize = parse_field(fields.next(), header_line, "hyperedge count")?;
    let num_nodes: usize = parse_field(fields.next(), header_line, "hypernode count")?;
    let fmt: u32 = match fields.next() {
        None => 0,
        Some(text) => parse_text(text, header_line, "format flag")?,
    };
    if !matches!(fmt, 0 | 1 | 10 | 11) {
        return Err(input_error(
            ErrorInfo::new("bad-format-flag", "format flag must be 0, 1, 10 or 11")
                .with_context("fmt", fmt)
                .with_context("line", header_line),
        ));
    }
    if fields.next().is_some() {
        return Err(input_error(
            ErrorInfo::new("bad-header", "trailing tokens after the header")
                .with_context("line", header_line),
        ));
    }
    let has_edge_weights = fmt % 10 == 1;
    let has_node_weights = fmt / 10 == 1;
    if num_nodes == 0 {
        return Err(input_error(ErrorInfo::new(
            "empty-hypergraph",
            "hypergraph needs at least one hypernode",
        )));
    }

    let mut pins: Vec<Vec<HypernodeId>> = Vec::with_capacity(num_edges);
    let mut edge_weights: Vec<HyperedgeWeight> = Vec::with_capacity(num_edges);
    for edge in 0..num_edges {
        let (line_number, line) = lines.next().ok_or_else(|| {
            input_error(
                ErrorInfo::new("missing-hyperedge", "fewer hyperedge lines than announced")
                    .with_context("expected", num_edges)
                    .with_context("read", edge),
            )
        })??;
        let mut tokens = line.split_whitespace();
        let weight: HyperedgeWeight = if has_edge_weights {
            let w = parse_field(tokens.next(), line_number, "hyperedge weight")?;
            if w <= 0 {
                return Err(input_error(
                    ErrorInfo::new("bad-hyperedge-weight", "hyperedge weights must be positive")
                        .with_context("line", line_number)
                        .with_context("weight", w),
                ));
            }
            w
        } else {
            1
        };
        let mut edge_pins: Vec<HypernodeId> = Vec::new();
        for token in tokens {
            let pin: usize = parse_text(token, line_number, "pin id")?;
            if pin == 0 || pin > num_nodes {
                return Err(input_error(
                    ErrorInfo::new("pin-out-of-range", "pin id outside 1..=|V|")
                        .with_context("line", line_number)
                        .with_context("pin", pin)
                        .with_context("num_nodes", num_nodes),
                ));
            }
            let pin = (pin - 1) as HypernodeId;
            // duplicate pins collapse silently, as in the original format
            if !edge_pins.contains(&pin) {
                edge_pins.push(pin);
            }
        }
        if edge_pins.is_empty() {
            return Err(input_error(
                ErrorInfo::new("empty-hyperedge", "hyperedge has no pins")
                    .with_context("line", line_number),
            ));
        }
        pins.push(edge_pins);
        edge_weights.push(weight);
    }

    let mut node_weights: Vec<HypernodeWeight> = Vec::new();
    if has_node_weights {
        node_weights.reserve(num_nodes);
        for node in 0..num_nodes {
            let (line_number, line) = lines.next().ok_or_else(|| {
                input_error(
                    ErrorInfo::new("missing-node-weight", "fewer weight lines than hypernodes")
                        .with_context("expected", num_nodes)
                        .with_context("read", node),
                )
            })??;
            let weight: HypernodeWeight = parse_text(line.trim(), line_number, "hypernode weight")?;
            if weight <= 0 {
                return Err(input_error(
                    ErrorInfo::new("bad-node-weight", "hypernode weights must be positive")
                        .with_context("line", line_number)
                        .with_context("weight", weight),
                ));
            }
            node_weights.push(weight);
        }
    }

    if let Some(extra) = lines.next() {
        let (line_number, _) = extra?;
        return Err(input_error(
            ErrorInfo::new("trailing-content", "unexpected content after the hypergraph")
                .with_context("line", line_number),
        ));
    }

    Ok(Hypergraph::new(
        num_nodes,
        k,
        &pins,
        &edge_weights,
        &node_weights,
    ))
}

/// Writes the partition file: line i holds the block of vertex i.
pub fn write_partition_file(hg: &Hypergraph, path: &Path) -> Result<(), HyparError> {
    let file = File::create(path).map_err(|err| {
        input_error(
            ErrorInfo::new("unwritable-partition-file", "cannot create partition file")
                .with_context("path", path.display())
                .with_context("cause", err),
        )
    })?;
    let mut writer = BufWriter::new(file);
    for v in 0..hg.initial_num_nodes() as HypernodeId {
        writeln!(writer, "{}", hg.part(v)).map_err(|err| {
            input_error(
                ErrorInfo::new("unwritable-partition-file", "cannot write partition file")
                    .with_context("path", path.display())
                    .with_context("cause", err),
            )
        })?;
    }
    Ok(())
}

/// Reads a partition file back into a label vector.
pub fn read_partition_file(path: &Path) -> Result<Vec<PartitionId>, HyparError> {
    let file = File::open(path).map_err(|err| {
        input_error(
            ErrorInfo::new("unreadable-partition-file", "cannot open partition file")
                .with_context("path", path.display())
                .with_context("cause", err),
        )
    })?;
    let reader = BufReader::new(file);
    let mut labels = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| {
            input_error(
                ErrorInfo::new("unreadable-partition-file", "cannot read partition file")
                    .with_context("line", number + 1)
                    .with_context("cause", err),
            )
        })?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        labels.push(parse_text(text, number + 1, "block id")?);
    }
    Ok(labels)
}

fn parse_field<T: std::str::FromStr>(
    token: Option<&str>,
    line: usize,
    what: &str,
) -> Result<T, HyparError> {
    let token = token.ok_or_else(|| {
        input_error(
            ErrorInfo::new("missing-token", format!("missing {what}")).with_context("line", line),
        )
    })?;
    parse_text(token, line, what)
}

fn parse_text<T: std::str::FromStr>(text: &str, line: usize, what: &str) -> Result<T, HyparError> {
    text.parse().map_err(|_| {
        input_error(
            ErrorInfo::new("bad-token", format!("cannot parse {what}"))
                .with_context("line", line)
                .with_context("token", text),
        )
    })
}

fn input_error(info: ErrorInfo) -> HyparError {
    HyparError::Input(info)
}
