//! Recursive similarity scoring of a submission against a reference.

use crate::detail::{Detail, DetailKind, Details, GradingResult};
use crate::graph::{CanonicalGraph, ReferenceGraph};
use crate::matching::StringMatching;
use crate::score_norm::ScoreNorm;
use crate::value::{Scalar, Value};
use closed01::Closed01;
use munkres::{solve_assignment, WeightMatrix};
use ndarray::Array2;
use std::collections::{BTreeMap, BTreeSet};

/// Score and explanation of one comparison.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub score: Closed01<f64>,
    pub kind: DetailKind,
}

/// Outcome of comparing two string collections.
#[derive(Debug, Clone)]
pub struct CollectionComparison {
    pub score: Closed01<f64>,
    /// Credit of every element found on either side.
    pub elements: BTreeMap<String, f64>,
    /// Student element to the solution element it was credited against.
    pub matched: BTreeMap<String, String>,
}

#[derive(Debug)]
pub struct Scorer<M: StringMatching> {
    matching: M,
    norm: ScoreNorm,
}

impl<M: StringMatching> Scorer<M> {
    pub fn new(matching: M, norm: ScoreNorm) -> Scorer<M> {
        Scorer { matching, norm }
    }

    /// Grade `student` against `solution`, scaling the similarity by the
    /// reference's points.
    pub fn score(&self, student: &CanonicalGraph, solution: &ReferenceGraph) -> GradingResult {
        let points = solution.points;
        if *student == solution.graph {
            tracing::debug!(points, "submission identical to reference");
            return GradingResult {
                achieved_points: points,
                max_points: points,
                details: Details::Identical,
            };
        }

        let (score, details) = self.compare_mappings(
            &mapping_of(student),
            &mapping_of(&solution.graph),
            1.0,
        );
        let achieved_points = score.get() * points;
        tracing::info!(
            score = score.get(),
            achieved_points,
            max_points = points,
            "graded submission"
        );
        GradingResult {
            achieved_points,
            max_points: points,
            details: Details::Breakdown(details),
        }
    }

    /// Compare two mappings key by key. `weight` is split evenly over the
    /// union of keys; keys only present in `student` do not count towards the
    /// denominator.
    pub fn compare_mappings(
        &self,
        student: &BTreeMap<String, Value>,
        solution: &BTreeMap<String, Value>,
        weight: f64,
    ) -> (Closed01<f64>, BTreeMap<String, Detail>) {
        let keys: BTreeSet<&String> = student.keys().chain(solution.keys()).collect();
        let mut details = BTreeMap::new();
        if keys.is_empty() {
            return (Closed01::one(), details);
        }

        let share = weight / keys.len() as f64;
        let mut total_score = 0.0;
        let mut max_score = 0.0;

        for key in keys {
            let detail = match (student.get(key), solution.get(key)) {
                (Some(student_value), Some(solution_value)) => {
                    let comparison = self.compare(student_value, solution_value, share);
                    let score = comparison.score.get();
                    total_score += score * share;
                    max_score += share;
                    Detail {
                        kind: comparison.kind,
                        score,
                        weight: share,
                    }
                }
                (None, Some(solution_value)) => {
                    max_score += share;
                    Detail {
                        kind: DetailKind::Missing {
                            solution_value: solution_value.clone(),
                        },
                        score: 0.0,
                        weight: share,
                    }
                }
                (Some(student_value), None) => Detail {
                    kind: DetailKind::Extra {
                        student_value: student_value.clone(),
                    },
                    score: 0.0,
                    weight: share,
                },
                (None, None) => unreachable!("key taken from one of both mappings"),
            };
            details.insert(key.clone(), detail);
        }

        let score = if max_score > 0.0 {
            clamp01(total_score / max_score)
        } else {
            Closed01::one()
        };
        (score, details)
    }

    /// Compare two values present on both sides.
    pub fn compare(&self, student: &Value, solution: &Value, weight: f64) -> Comparison {
        match (student, solution) {
            (Value::Mapping(a), Value::Mapping(b)) => {
                let (score, details) = self.compare_mappings(a, b, weight);
                Comparison {
                    score,
                    kind: DetailKind::Nested { details },
                }
            }
            (Value::Collection(a), Value::Collection(b)) => {
                let CollectionComparison {
                    score,
                    elements,
                    matched,
                } = self.compare_collections(a, b);
                Comparison {
                    score,
                    kind: DetailKind::Collection { elements, matched },
                }
            }
            (Value::Scalar(Scalar::Text(a)), Value::Scalar(Scalar::Text(b))) => Comparison {
                score: self.matching.string_matching(a, b),
                kind: value_detail(student, solution),
            },
            _ => {
                if std::mem::discriminant(student) != std::mem::discriminant(solution) {
                    tracing::debug!("comparing values of different shapes by equality");
                }
                Comparison {
                    score: if student == solution {
                        Closed01::one()
                    } else {
                        Closed01::zero()
                    },
                    kind: value_detail(student, solution),
                }
            }
        }
    }

    /// Element-wise comparison of two string collections.
    ///
    /// Common elements are worth 1.0. Elements only the student has are paired
    /// one-to-one with elements only the solution has, maximizing the total
    /// string similarity, and are worth the similarity of their partner.
    /// Unpaired elements are worth 0.0.
    pub fn compare_collections(
        &self,
        student: &BTreeSet<String>,
        solution: &BTreeSet<String>,
    ) -> CollectionComparison {
        if student == solution {
            return CollectionComparison {
                score: Closed01::one(),
                elements: solution.iter().map(|e| (e.clone(), 1.0)).collect(),
                matched: BTreeMap::new(),
            };
        }

        let mut elements: BTreeMap<String, f64> = BTreeMap::new();
        let mut matched = BTreeMap::new();
        let mut sum = 0.0;

        for element in student.intersection(solution) {
            elements.insert(element.clone(), 1.0);
            sum += 1.0;
        }

        let extra: Vec<&String> = student.difference(solution).collect();
        let missing: Vec<&String> = solution.difference(student).collect();
        let partners = self.assign_partners(&extra, &missing);

        for (element, partner) in extra.iter().zip(partners) {
            let credit = match partner {
                Some((j, similarity)) => {
                    matched.insert((*element).clone(), (*missing[j]).clone());
                    similarity
                }
                None => 0.0,
            };
            elements.insert((*element).clone(), credit);
            sum += credit;
        }
        for element in missing {
            elements.insert(element.clone(), 0.0);
        }

        let denominator = self.norm.denominator(student.len(), solution.len()) as f64;
        CollectionComparison {
            score: clamp01(sum / denominator),
            elements,
            matched,
        }
    }

    /// Pairs every `extra` element with at most one `missing` element by an
    /// optimal one-to-one assignment. Yields the partner's index and the
    /// similarity, or `None` when nothing similar was left.
    fn assign_partners(
        &self,
        extra: &[&String],
        missing: &[&String],
    ) -> Vec<Option<(usize, f64)>> {
        let mut partners = vec![None; extra.len()];
        if extra.is_empty() || missing.is_empty() {
            return partners;
        }

        let n = extra.len().max(missing.len());
        let similarity = Array2::from_shape_fn((n, n), |(i, j)| {
            match (extra.get(i), missing.get(j)) {
                (Some(a), Some(b)) => self.matching.string_matching(a, b).get(),
                _ => 0.0,
            }
        });

        // munkres minimizes, so assign on dissimilarity
        let costs: Vec<f64> = similarity.iter().map(|s| 1.0 - s).collect();
        let mut weights = WeightMatrix::from_row_vec(n, costs);
        match solve_assignment(&mut weights) {
            Ok(assignment) => {
                for pos in assignment {
                    let s = similarity[(pos.row, pos.column)];
                    if pos.row < extra.len() && pos.column < missing.len() && s > 0.0 {
                        partners[pos.row] = Some((pos.column, s));
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = ?e, "element assignment failed; no partial credit given");
            }
        }
        partners
    }
}

fn mapping_of(graph: &CanonicalGraph) -> BTreeMap<String, Value> {
    graph
        .iter()
        .map(|(name, record)| (name.clone(), Value::from(record)))
        .collect()
}

fn value_detail(student: &Value, solution: &Value) -> DetailKind {
    DetailKind::Value {
        student_value: student.clone(),
        solution_value: solution.clone(),
    }
}

fn clamp01(x: f64) -> Closed01<f64> {
    Closed01::new(x.max(0.0).min(1.0))
}
