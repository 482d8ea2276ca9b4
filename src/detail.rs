//! Grading results and the detail tree explaining them.
//!
//! The serialized form is what the report renderer consumes:
//!
//! ```json
//! {
//!   "Gesamtpunktzahl": 75.0,
//!   "Erreichbare_punktzahl": 100.0,
//!   "details": {
//!     "Doctor": {"status": "nested", "score": 0.75, "weight": 0.5, "details": {...}},
//!     "Nurse": {"status": "missing", "score": 0.0, "weight": 0.5, "solution_value": {...}}
//!   }
//! }
//! ```

use crate::value::Value;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

/// The comparison outcome for one key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detail {
    #[serde(flatten)]
    pub kind: DetailKind,
    /// Similarity in [0, 1]
    pub score: f64,
    /// Share of the parent's weight this key accounts for. Extra keys carry
    /// their share for reference but never count towards the denominator.
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DetailKind {
    Missing {
        solution_value: Value,
    },
    Extra {
        student_value: Value,
    },
    Nested {
        details: BTreeMap<String, Detail>,
    },
    Collection {
        elements: BTreeMap<String, f64>,
        /// Misspelled student elements and the solution element they were
        /// credited against.
        #[serde(skip_serializing_if = "BTreeMap::is_empty")]
        matched: BTreeMap<String, String>,
    },
    Value {
        student_value: Value,
        solution_value: Value,
    },
}

impl DetailKind {
    pub fn status(&self) -> &'static str {
        match self {
            DetailKind::Missing { .. } => "missing",
            DetailKind::Extra { .. } => "extra",
            DetailKind::Nested { .. } => "nested",
            DetailKind::Collection { .. } => "collection",
            DetailKind::Value { .. } => "value",
        }
    }
}

/// Top-level detail tree of a grading result.
#[derive(Debug, Clone, PartialEq)]
pub enum Details {
    /// The submission equals the reference; serialized as `{"status": "identical"}`.
    Identical,
    Breakdown(BTreeMap<String, Detail>),
}

impl Details {
    pub fn get(&self, key: &str) -> Option<&Detail> {
        match self {
            Details::Identical => None,
            Details::Breakdown(details) => details.get(key),
        }
    }
}

impl Serialize for Details {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Details::Identical => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("status", "identical")?;
                map.end()
            }
            Details::Breakdown(details) => details.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradingResult {
    #[serde(rename = "Gesamtpunktzahl")]
    pub achieved_points: f64,
    #[serde(rename = "Erreichbare_punktzahl")]
    pub max_points: f64,
    pub details: Details,
}

/// One row of a flattened report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub category: String,
    pub status: &'static str,
    pub score: f64,
}

impl GradingResult {
    /// Achieved fraction of the maximum, 1.0 when nothing was achievable.
    pub fn ratio(&self) -> f64 {
        if self.max_points > 0.0 {
            self.achieved_points / self.max_points
        } else {
            1.0
        }
    }

    /// One row per top-level key, in key order.
    pub fn summary(&self) -> Vec<SummaryRow> {
        match &self.details {
            Details::Identical => Vec::new(),
            Details::Breakdown(details) => details
                .iter()
                .map(|(key, detail)| SummaryRow {
                    category: key.clone(),
                    status: detail.kind.status(),
                    score: detail.score,
                })
                .collect(),
        }
    }
}
