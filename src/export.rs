//! Reading graph exports produced by the diagram editor.

use crate::error::{GradingError, Result};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;

/// The raw `{"nodes": [...], "edges": [...]}` document.
///
/// Edges are kept as raw JSON so that one edge without a usable `id` does
/// not make the whole file unreadable.
#[derive(Debug, Clone, Deserialize)]
pub struct RawExport {
    pub nodes: Vec<JsonValue>,
    pub edges: Vec<JsonValue>,
    /// Only meaningful for reference exports.
    #[serde(default, alias = "punkte")]
    pub points: Option<f64>,
}

impl RawExport {
    pub fn load(path: &Path) -> Result<RawExport> {
        let content = fs::read_to_string(path).map_err(|source| GradingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        RawExport::from_json_str(&content, path)
    }

    pub fn from_json_str(content: &str, path: &Path) -> Result<RawExport> {
        let value: JsonValue =
            serde_json::from_str(content).map_err(|source| GradingError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let object = value.as_object().ok_or_else(|| GradingError::InvalidExport {
            path: path.to_path_buf(),
            reason: "top level is not an object".to_string(),
        })?;
        for key in ["nodes", "edges"] {
            match object.get(key) {
                Some(JsonValue::Array(_)) => {}
                Some(_) => {
                    return Err(GradingError::InvalidExport {
                        path: path.to_path_buf(),
                        reason: format!("`{}` is not an array", key),
                    })
                }
                None => {
                    return Err(GradingError::InvalidExport {
                        path: path.to_path_buf(),
                        reason: format!("missing `{}` collection", key),
                    })
                }
            }
        }

        if object.contains_key("points") && object.contains_key("punkte") {
            return Err(GradingError::InvalidExport {
                path: path.to_path_buf(),
                reason: "both `points` and `punkte` are given".to_string(),
            });
        }

        RawExport::deserialize(value).map_err(|e| GradingError::InvalidExport {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Edge ids in document order; `None` for edges without a string `id`.
    pub fn edge_ids(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.edges
            .iter()
            .map(|edge| edge.get("id").and_then(JsonValue::as_str))
    }
}
