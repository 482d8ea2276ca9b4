use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreNorm {
    /// Divide by the size of the solution collection (at least 1).
    /// Extra student elements cost nothing.
    #[default]
    Solution,

    /// Divide by the size of the larger collection (at least 1).
    /// Extra student elements dilute the score.
    Max,
}

impl ScoreNorm {
    pub fn denominator(self, student_len: usize, solution_len: usize) -> usize {
        match self {
            ScoreNorm::Solution => solution_len.max(1),
            ScoreNorm::Max => solution_len.max(student_len).max(1),
        }
    }
}
