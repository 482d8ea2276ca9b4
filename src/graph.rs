use crate::config::{check_points, NameCase, DEFAULT_POINTS};
use crate::error::Result;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::collections::btree_map::{Entry, Iter};
use std::collections::{BTreeMap, BTreeSet};

/// Adjacent names and attribute names of one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(default)]
    pub edges: BTreeSet<String>,
    #[serde(default)]
    pub attr: BTreeSet<String>,
}

impl NodeRecord {
    pub fn new() -> NodeRecord {
        NodeRecord::default()
    }
}

/// The canonical graph: node name to its edges and attributes.
///
/// Every name that appears in some `edges` or `attr` set produced by
/// [`GraphBuilder`] is also a key of the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalGraph {
    nodes: BTreeMap<String, NodeRecord>,
}

impl CanonicalGraph {
    pub fn new() -> CanonicalGraph {
        CanonicalGraph::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, name: &str) -> Option<&NodeRecord> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn iter(&self) -> Iter<'_, String, NodeRecord> {
        self.nodes.iter()
    }

    /// Insert or replace a node. Meant for hand-built graphs; the builder never
    /// replaces records.
    pub fn insert(&mut self, name: impl Into<String>, record: NodeRecord) -> Option<NodeRecord> {
        self.nodes.insert(name.into(), record)
    }

    pub fn remove(&mut self, name: &str) -> Option<NodeRecord> {
        self.nodes.remove(name)
    }
}

impl<'a> IntoIterator for &'a CanonicalGraph {
    type Item = (&'a String, &'a NodeRecord);
    type IntoIter = Iter<'a, String, NodeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl<S: Into<String>> FromIterator<(S, NodeRecord)> for CanonicalGraph {
    fn from_iter<I: IntoIterator<Item = (S, NodeRecord)>>(iter: I) -> Self {
        CanonicalGraph {
            nodes: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// A canonical graph for the correct answer plus the points it is worth.
///
/// In JSON the points sit next to the nodes, under `points` or `punkte`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceGraph {
    #[serde(flatten)]
    pub graph: CanonicalGraph,
    pub points: f64,
}

impl<'de> Deserialize<'de> for ReferenceGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let mut fields = BTreeMap::<String, JsonValue>::deserialize(deserializer)?;
        let points = match (fields.remove("points"), fields.remove("punkte")) {
            (Some(p), None) | (None, Some(p)) => f64::deserialize(p).map_err(D::Error::custom)?,
            (None, None) => DEFAULT_POINTS,
            (Some(_), Some(_)) => {
                return Err(D::Error::custom("both `points` and `punkte` are given"))
            }
        };
        let points = check_points(points).map_err(D::Error::custom)?;
        let nodes = fields
            .into_iter()
            .map(|(name, v)| NodeRecord::deserialize(v).map(|record| (name, record)))
            .collect::<std::result::Result<_, _>>()
            .map_err(D::Error::custom)?;
        Ok(ReferenceGraph {
            graph: CanonicalGraph { nodes },
            points,
        })
    }
}

impl ReferenceGraph {
    /// Fails for negative or non-finite point totals.
    pub fn new(graph: CanonicalGraph, points: f64) -> Result<ReferenceGraph> {
        Ok(ReferenceGraph {
            graph,
            points: check_points(points)?,
        })
    }

    pub fn with_default_points(graph: CanonicalGraph) -> ReferenceGraph {
        ReferenceGraph {
            graph,
            points: DEFAULT_POINTS,
        }
    }
}

/// Incrementally grows a [`CanonicalGraph`]. Nodes are created on first
/// reference and sets only ever grow.
pub struct GraphBuilder {
    name_case: NameCase,
    graph: CanonicalGraph,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        GraphBuilder::new(NameCase::default())
    }
}

impl GraphBuilder {
    pub fn new(name_case: NameCase) -> GraphBuilder {
        GraphBuilder {
            name_case,
            graph: CanonicalGraph::new(),
        }
    }

    pub fn graph(self) -> CanonicalGraph {
        self.graph
    }

    pub fn num_nodes(&self) -> usize {
        self.graph.len()
    }

    fn key(&self, name: &str) -> String {
        self.name_case.apply(name.trim())
    }

    // returns the node record, creating an empty one if needed
    pub fn add_or_get_node(&mut self, name: &str) -> &mut NodeRecord {
        let key = self.key(name);
        match self.graph.nodes.entry(key) {
            Entry::Vacant(e) => e.insert(NodeRecord::new()),
            Entry::Occupied(e) => e.into_mut(),
        }
    }

    /// Adds `attribute` to the attribute set of `owner`. Both become nodes.
    pub fn add_attribute(&mut self, owner: &str, attribute: &str) {
        let attribute_key = self.key(attribute);
        self.add_or_get_node(attribute);
        self.add_or_get_node(owner).attr.insert(attribute_key);
    }

    /// Adds `target` to the edge set of `source`. Both become nodes.
    pub fn add_edge(&mut self, source: &str, target: &str) {
        let target_key = self.key(target);
        self.add_or_get_node(target);
        self.add_or_get_node(source).edges.insert(target_key);
    }
}
