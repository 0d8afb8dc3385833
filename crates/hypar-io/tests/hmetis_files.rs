use std::io::Write;

use hypar_core::HyparError;
use hypar_io::hmetis::{read_hypergraph_file, read_partition_file, write_partition_file};
use tempfile::NamedTempFile;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write");
    file
}

#[test]
fn plain_format_defaults_to_unit_weights() {
    let file = write_temp("% a comment\n4 7 0\n1 2\n1 7 5 6\n5 6 4\n2 3 4\n");
    let hg = read_hypergraph_file(file.path(), 2).unwrap();

    assert_eq!(hg.initial_num_nodes(), 7);
    assert_eq!(hg.initial_num_edges(), 4);
    assert_eq!(hg.total_weight(), 7);
    assert_eq!(hg.edge_weight(1), 1);
    assert_eq!(hg.pins(1), &[0, 6, 4, 5]);
}

#[test]
fn format_one_reads_edge_weights() {
    let file = write_temp("2 3 1\n5 1 2\n9 2 3\n");
    let hg = read_hypergraph_file(file.path(), 2).unwrap();
    assert_eq!(hg.edge_weight(0), 5);
    assert_eq!(hg.edge_weight(1), 9);
    assert_eq!(hg.node_weight(0), 1);
}

#[test]
fn format_ten_reads_node_weights() {
    let file = write_temp("1 3 10\n1 2 3\n4\n5\n6\n");
    let hg = read_hypergraph_file(file.path(), 2).unwrap();
    assert_eq!(hg.edge_weight(0), 1);
    assert_eq!(hg.node_weight(0), 4);
    assert_eq!(hg.node_weight(2), 6);
    assert_eq!(hg.total_weight(), 15);
}

#[test]
fn format_eleven_reads_both_weight_kinds() {
    let file = write_temp("2 2 11\n3 1 2\n4 2 1\n7\n8\n");
    let hg = read_hypergraph_file(file.path(), 2).unwrap();
    assert_eq!(hg.edge_weight(0), 3);
    assert_eq!(hg.edge_weight(1), 4);
    assert_eq!(hg.node_weight(1), 8);
}

#[test]
fn malformed_inputs_are_rejected() {
    let cases = [
        ("", "empty-hypergraph-file"),
        ("2 4 7\n1 2\n3 4\n", "bad-format-flag"),
        ("2 4\n1 2\n", "missing-hyperedge"),
        ("1 4\n1 9\n", "pin-out-of-range"),
        ("1 4\n\n", "missing-hyperedge"),
        ("1 4 1\n0 1 2\n", "bad-hyperedge-weight"),
        ("1 3 10\n1 2\n4\n-1\n5\n", "bad-node-weight"),
        ("1 2\n1 2\n1 2\n", "trailing-content"),
        ("x 4\n1 2\n", "bad-token"),
    ];
    for (content, expected_code) in cases {
        let file = write_temp(content);
        let err = read_hypergraph_file(file.path(), 2).unwrap_err();
        match err {
            HyparError::Input(info) => {
                assert_eq!(info.code, expected_code, "for input {content:?}")
            }
            other => panic!("expected input error for {content:?}, got {other:?}"),
        }
    }
}

#[test]
fn partition_files_roundtrip() {
    let file = write_temp("2 4 0\n1 2\n3 4\n");
    let mut hg = read_hypergraph_file(file.path(), 2).unwrap();
    for (v, block) in [(0, 0), (1, 0), (2, 1), (3, 1)] {
        hg.set_part(v, block);
    }

    let out = NamedTempFile::new().unwrap();
    write_partition_file(&hg, out.path()).unwrap();
    let labels = read_partition_file(out.path()).unwrap();
    assert_eq!(labels, vec![0, 0, 1, 1]);
}
