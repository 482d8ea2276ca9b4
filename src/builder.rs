//! Reconstruction of canonical graphs from diagram exports.

use crate::config::NameCase;
use crate::decode::{decode_edge_id, Decoded, DecodedEdge};
use crate::error::Result;
use crate::export::RawExport;
use crate::graph::{CanonicalGraph, GraphBuilder};
use std::path::Path;

/// Counts of how the edges of one export were handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub applied: usize,
    pub malformed: usize,
    pub unrecognized: usize,
    pub missing_id: usize,
}

impl BuildStats {
    pub fn skipped(&self) -> usize {
        self.malformed + self.unrecognized + self.missing_id
    }
}

impl GraphBuilder {
    /// Record the meaning of one decoded edge.
    pub fn apply(&mut self, edge: &DecodedEdge) {
        match edge {
            DecodedEdge::CompositeAttribute {
                entity,
                attribute,
                sub_attributes,
            } => {
                self.add_attribute(entity, attribute);
                for sub in sub_attributes {
                    self.add_attribute(attribute, sub);
                }
                self.add_edge(attribute, entity);
            }
            DecodedEdge::Attribute { entity, attribute } => {
                self.add_attribute(entity, attribute);
            }
            DecodedEdge::Generalization { child, parent, .. } => {
                self.add_edge(child, parent);
            }
            DecodedEdge::Relationship {
                name,
                source,
                target,
            } => {
                self.add_or_get_node(name);
                self.add_edge(name, source);
                self.add_edge(name, target);
            }
        }
    }

    /// Decode and apply one edge id. Malformed and unrecognized ids are
    /// logged and leave the graph untouched.
    pub fn apply_edge_id(&mut self, id: &str) -> Decoded {
        let decoded = decode_edge_id(id);
        match &decoded {
            Decoded::Edge(edge) => {
                tracing::debug!(id, kind = %edge.kind(), "decoded edge");
                self.apply(edge);
            }
            Decoded::Malformed(e) => {
                tracing::warn!(id, reason = e.reason, kind = %e.kind, "skipping malformed edge");
            }
            Decoded::Unrecognized => {
                tracing::info!(id, "skipping edge with unrecognized marker");
            }
        }
        decoded
    }

    /// Apply every edge of an export, collecting statistics.
    pub fn apply_export(&mut self, export: &RawExport) -> BuildStats {
        let mut stats = BuildStats::default();
        for (index, id) in export.edge_ids().enumerate() {
            let id = match id {
                Some(id) => id,
                None => {
                    tracing::warn!(index, "skipping edge without a string id");
                    stats.missing_id += 1;
                    continue;
                }
            };
            match self.apply_edge_id(id) {
                Decoded::Edge(_) => stats.applied += 1,
                Decoded::Malformed(_) => stats.malformed += 1,
                Decoded::Unrecognized => stats.unrecognized += 1,
            }
        }
        stats
    }
}

/// Build the canonical graph of an already loaded export.
pub fn build_from_export(export: &RawExport, name_case: NameCase) -> (CanonicalGraph, BuildStats) {
    let mut builder = GraphBuilder::new(name_case);
    let stats = builder.apply_export(export);
    tracing::info!(
        nodes = builder.num_nodes(),
        applied = stats.applied,
        skipped = stats.skipped(),
        "built canonical graph"
    );
    (builder.graph(), stats)
}

/// Build the canonical graph of the export stored at `path`.
pub fn build_graph_with(path: &Path, name_case: NameCase) -> Result<(CanonicalGraph, BuildStats)> {
    let export = RawExport::load(path)?;
    tracing::debug!(?path, edges = export.edges.len(), nodes = export.nodes.len(), "loaded export");
    Ok(build_from_export(&export, name_case))
}
