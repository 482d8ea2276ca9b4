use closed01::Closed01;
use std::fmt::Debug;

pub trait StringMatching: Debug {
    /// Determines how close a string `student` of the submission is to a string `solution` of
    /// the reference. Identical strings MUST yield 1.0; completely unrelated strings should
    /// yield values near 0.0 so that they earn no partial credit.
    ///
    /// NOTE: The returned value MUST be in the range [0, 1].
    fn string_matching(&self, student: &str, solution: &str) -> Closed01<f64>;
}

/// Ratcliff/Obershelp ratio over characters. Lowercases both strings first
/// unless `case_sensitive` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceRatio {
    pub case_sensitive: bool,
}

impl StringMatching for SequenceRatio {
    fn string_matching(&self, student: &str, solution: &str) -> Closed01<f64> {
        if self.case_sensitive {
            sequence_ratio(student, solution)
        } else {
            sequence_ratio(&student.to_lowercase(), &solution.to_lowercase())
        }
    }
}

/// All-or-nothing comparison. Use `ExactStrings` to disable partial credit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactStrings;

impl StringMatching for ExactStrings {
    fn string_matching(&self, student: &str, solution: &str) -> Closed01<f64> {
        if student == solution {
            Closed01::one()
        } else {
            Closed01::zero()
        }
    }
}

/// `2 * M / T` where `T` is the total number of characters and `M` the number
/// of characters in matching blocks. Matching blocks are found by taking the
/// longest common substring and recursing on both sides of it.
pub fn sequence_ratio(a: &str, b: &str) -> Closed01<f64> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return Closed01::one();
    }
    let matches = matching_characters(&a, &b);
    let ratio = (2 * matches) as f64 / total as f64;
    Closed01::new(ratio.min(1.0))
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`.
/// Ties go to the block that starts earliest in `a`, then in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0);
    let width = bhi - blo + 1;
    // prev[x]: length of the common suffix ending at a[i - 1] and b[blo + x - 1]
    let mut prev = vec![0usize; width];
    let mut curr = vec![0usize; width];
    for i in alo..ahi {
        for j in blo..bhi {
            let x = j - blo + 1;
            curr[x] = if a[i] == b[j] { prev[x - 1] + 1 } else { 0 };
            let k = curr[x];
            if k > best.2 {
                best = (i + 1 - k, j + 1 - k, k);
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    best
}
