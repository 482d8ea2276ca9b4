#![allow(dead_code)]

use er_grader::{CanonicalGraph, NodeRecord, ReferenceGraph};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Write an export with the given edge ids into `dir` and return its path.
pub fn write_export(dir: &Path, file_name: &str, edge_ids: &[&str]) -> PathBuf {
    let edges: Vec<_> = edge_ids.iter().map(|id| json!({ "id": id })).collect();
    let document = json!({ "nodes": [], "edges": edges });
    let path = dir.join(file_name);
    fs::write(&path, serde_json::to_string_pretty(&document).unwrap()).unwrap();
    path
}

pub fn node(edges: &[&str], attr: &[&str]) -> NodeRecord {
    NodeRecord {
        edges: edges.iter().map(|s| s.to_string()).collect(),
        attr: attr.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn graph(nodes: Vec<(&str, NodeRecord)>) -> CanonicalGraph {
    nodes.into_iter().collect()
}

pub fn reference(nodes: Vec<(&str, NodeRecord)>, points: f64) -> ReferenceGraph {
    ReferenceGraph::new(graph(nodes), points).unwrap()
}

/// A small clinic diagram: two entities, one relationship, one composite attribute.
pub fn clinic() -> CanonicalGraph {
    graph(vec![
        ("Doctor", node(&[], &["Name", "DoctorID"])),
        ("Name", node(&[], &[])),
        ("DoctorID", node(&[], &[])),
        ("Patient", node(&[], &["Name", "Address"])),
        ("Address", node(&["Patient"], &["Street", "City"])),
        ("Street", node(&[], &[])),
        ("City", node(&[], &[])),
        ("treats", node(&["Doctor", "Patient"], &[])),
    ])
}
