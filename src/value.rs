//! The shapes the scorer compares: nested mappings, string collections and
//! scalars.

use crate::graph::{CanonicalGraph, NodeRecord};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Mapping(BTreeMap<String, Value>),
    Collection(BTreeSet<String>),
    Scalar(Scalar),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Value {
        Value::Scalar(Scalar::Text(s.into()))
    }
}

impl From<&NodeRecord> for Value {
    fn from(record: &NodeRecord) -> Value {
        let mut fields = BTreeMap::new();
        fields.insert("edges".to_string(), Value::Collection(record.edges.clone()));
        fields.insert("attr".to_string(), Value::Collection(record.attr.clone()));
        Value::Mapping(fields)
    }
}

impl From<&CanonicalGraph> for Value {
    fn from(graph: &CanonicalGraph) -> Value {
        Value::Mapping(
            graph
                .iter()
                .map(|(name, record)| (name.clone(), Value::from(record)))
                .collect(),
        )
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Value::Scalar(Scalar::Number(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl<S: Into<String>> FromIterator<S> for Value {
    /// Collects strings into a [`Value::Collection`].
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Value {
        Value::Collection(iter.into_iter().map(Into::into).collect())
    }
}
