//! Grading of entity-relationship diagrams against a reference solution.
//!
//! Grading is a two stage pipeline:
//!
//! 1. [`build_graph`] reads a diagram export (`{"nodes": [...], "edges": [...]}`)
//!    and decodes the marker-encoded edge ids into a [`CanonicalGraph`], a map
//!    from node name to its adjacent names (`edges`) and attribute names (`attr`).
//! 2. [`score`] compares that graph with a [`ReferenceGraph`] recursively and
//!    returns a [`GradingResult`]: achieved points, maximum points and a detail
//!    tree with partial credit for near-miss names.
//!
//! [`Grader`] bundles both stages with an explicit [`GradingConfig`].

pub mod batch;
pub mod builder;
pub mod config;
pub mod decode;
pub mod detail;
pub mod error;
pub mod export;
pub mod graph;
pub mod logging;
pub mod matching;
mod score_norm;
pub mod scorer;
pub mod value;

use std::path::Path;

pub use batch::{OutcomeStatus, SubmissionOutcome};
pub use builder::BuildStats;
pub use config::{GradingConfig, NameCase};
pub use detail::{Detail, DetailKind, Details, GradingResult};
pub use error::{GradingError, Result};
pub use graph::{CanonicalGraph, GraphBuilder, NodeRecord, ReferenceGraph};
pub use matching::{sequence_ratio, ExactStrings, SequenceRatio, StringMatching};
pub use score_norm::*;
pub use scorer::{CollectionComparison, Scorer};
pub use value::{Scalar, Value};

/// Build the canonical graph of the export at `path` with default settings.
pub fn build_graph<P: AsRef<Path>>(path: P) -> Result<CanonicalGraph> {
    Grader::default().build_graph(path.as_ref())
}

/// Load a reference export at `path` with default settings.
pub fn load_reference<P: AsRef<Path>>(path: P) -> Result<ReferenceGraph> {
    Grader::default().load_reference(path.as_ref())
}

/// Grade `student` against `solution` with default settings.
pub fn score(student: &CanonicalGraph, solution: &ReferenceGraph) -> GradingResult {
    Grader::default().score(student, solution)
}

/// Graph builder and scorer sharing one configuration.
#[derive(Debug, Clone, Default)]
pub struct Grader {
    config: GradingConfig,
}

impl Grader {
    pub fn new(config: GradingConfig) -> Result<Grader> {
        config.validate()?;
        Ok(Grader { config })
    }

    pub fn config(&self) -> &GradingConfig {
        &self.config
    }

    pub fn build_graph(&self, path: &Path) -> Result<CanonicalGraph> {
        self.build_graph_with_stats(path).map(|(graph, _)| graph)
    }

    pub fn build_graph_with_stats(&self, path: &Path) -> Result<(CanonicalGraph, BuildStats)> {
        builder::build_graph_with(path, self.config.name_case)
    }

    /// Build a reference graph. Its points come from the export's `points` or
    /// `punkte` field, falling back to the configured default.
    pub fn load_reference(&self, path: &Path) -> Result<ReferenceGraph> {
        let export = export::RawExport::load(path)?;
        let (graph, _) = builder::build_from_export(&export, self.config.name_case);
        let points = export.points.unwrap_or(self.config.default_points);
        tracing::debug!(?path, points, nodes = graph.len(), "loaded reference");
        ReferenceGraph::new(graph, points)
    }

    pub fn scorer(&self) -> Scorer<SequenceRatio> {
        Scorer::new(
            SequenceRatio {
                case_sensitive: self.config.case_sensitive,
            },
            self.config.collection_norm,
        )
    }

    pub fn score(&self, student: &CanonicalGraph, solution: &ReferenceGraph) -> GradingResult {
        self.scorer().score(student, solution)
    }
}
