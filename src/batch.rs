//! Grading many submission files against one reference.

use crate::detail::GradingResult;
use crate::graph::ReferenceGraph;
use crate::Grader;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Failed,
}

/// What happened to one submission file.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub filename: String,
    pub path: PathBuf,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grading: Option<GradingResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl Grader {
    /// Grade one submission file. Input errors become a failed outcome
    /// instead of an error.
    pub fn grade_file(&self, path: &Path, reference: &ReferenceGraph) -> SubmissionOutcome {
        let filename = file_name(path);
        match self.build_graph(path) {
            Ok(student) => SubmissionOutcome {
                filename,
                path: path.to_path_buf(),
                status: OutcomeStatus::Success,
                grading: Some(self.score(&student, reference)),
                message: None,
            },
            Err(e) => {
                tracing::warn!(?path, error = %e, "could not grade submission");
                SubmissionOutcome {
                    filename,
                    path: path.to_path_buf(),
                    status: OutcomeStatus::Failed,
                    grading: None,
                    message: Some(format!("could not grade this submission: {}", e)),
                }
            }
        }
    }

    /// Grade every file independently; one failure never stops the others.
    pub fn grade_files<I, P>(&self, paths: I, reference: &ReferenceGraph) -> Vec<SubmissionOutcome>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let outcomes: Vec<SubmissionOutcome> = paths
            .into_iter()
            .map(|p| self.grade_file(p.as_ref(), reference))
            .collect();
        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        tracing::info!(graded = outcomes.len() - failed, failed, "batch finished");
        outcomes
    }
}
