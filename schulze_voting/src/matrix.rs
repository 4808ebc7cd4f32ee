use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{Ballot, CandidateId};

/// A square table of counts between candidates, without the diagonal.
///
/// It is stored as nested mappings keyed by candidate id, which is also how it is
/// serialized: `{"1": {"2": 20, "3": 26}, ...}`. Every candidate has a row, even
/// when it is the only candidate and the row is empty.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix(BTreeMap<CandidateId, BTreeMap<CandidateId, u64>>);

impl Matrix {
    /// A matrix with a zero entry for every ordered pair of distinct candidates.
    pub fn zeroed(candidates: &[CandidateId]) -> Matrix {
        let mut rows = BTreeMap::new();
        for &c1 in candidates.iter() {
            let row: BTreeMap<CandidateId, u64> = candidates
                .iter()
                .filter(|&&c2| c2 != c1)
                .map(|&c2| (c2, 0))
                .collect();
            rows.insert(c1, row);
        }
        Matrix(rows)
    }

    /// Builds a matrix from explicit rows. Mostly useful to write down known tables.
    pub fn from_rows(rows: &[(u32, &[(u32, u64)])]) -> Matrix {
        let mut m = BTreeMap::new();
        for (c1, row) in rows.iter() {
            let r: BTreeMap<CandidateId, u64> =
                row.iter().map(|(c2, v)| (CandidateId(*c2), *v)).collect();
            m.insert(CandidateId(*c1), r);
        }
        Matrix(m)
    }

    /// The entry for (a, b). Absent entries read as zero.
    pub fn get(&self, a: CandidateId, b: CandidateId) -> u64 {
        self.0
            .get(&a)
            .and_then(|row| row.get(&b))
            .cloned()
            .unwrap_or(0)
    }

    /// The entry for (a, b), if the pair is part of the matrix.
    pub fn entry(&self, a: CandidateId, b: CandidateId) -> Option<u64> {
        self.0.get(&a).and_then(|row| row.get(&b)).cloned()
    }

    pub fn set(&mut self, a: CandidateId, b: CandidateId, value: u64) {
        self.0.entry(a).or_default().insert(b, value);
    }

    fn increment(&mut self, a: CandidateId, b: CandidateId) {
        if let Some(v) = self.0.get_mut(&a).and_then(|row| row.get_mut(&b)) {
            *v += 1;
        }
    }

    /// The candidates that have a row, in increasing order.
    pub fn candidates(&self) -> Vec<CandidateId> {
        self.0.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Counts, for every ordered pair (A, B), the ballots that rank A strictly ahead of B.
///
/// Candidates missing from a ballot never generate a count from it. Ids that are
/// not part of `candidates` are ignored.
pub fn compute_preferences(ballots: &[Ballot], candidates: &[CandidateId]) -> Matrix {
    let mut preferences = Matrix::zeroed(candidates);
    for ballot in ballots.iter() {
        for (idx, &c1) in ballot.ranking.iter().enumerate() {
            for &c2 in ballot.ranking[idx + 1..].iter() {
                preferences.increment(c1, c2);
            }
        }
    }
    debug!(
        "compute_preferences: {} ballots, {} candidates: {:?}",
        ballots.len(),
        candidates.len(),
        preferences
    );
    preferences
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    pub fn ids(xs: &[u32]) -> Vec<CandidateId> {
        xs.iter().map(|x| CandidateId(*x)).collect()
    }

    fn repeat(count: usize, ranking: &[u32]) -> Vec<Ballot> {
        (0..count)
            .map(|idx| Ballot::new(&format!("v{:?}-{}", ranking, idx), ranking))
            .collect()
    }

    /// The 45 ballots of the Wikipedia example, with A..E numbered 1..5.
    pub fn wikipedia_ballots() -> Vec<Ballot> {
        let mut res = Vec::new();
        res.extend(repeat(5, &[1, 3, 2, 5, 4]));
        res.extend(repeat(5, &[1, 4, 5, 3, 2]));
        res.extend(repeat(8, &[2, 5, 4, 1, 3]));
        res.extend(repeat(3, &[3, 1, 2, 5, 4]));
        res.extend(repeat(7, &[3, 1, 5, 2, 4]));
        res.extend(repeat(2, &[3, 2, 1, 4, 5]));
        res.extend(repeat(7, &[4, 3, 5, 2, 1]));
        res.extend(repeat(8, &[5, 2, 1, 4, 3]));
        res
    }

    pub fn wikipedia_preferences() -> Matrix {
        Matrix::from_rows(&[
            (1, &[(2, 20), (3, 26), (4, 30), (5, 22)]),
            (2, &[(1, 25), (3, 16), (4, 33), (5, 18)]),
            (3, &[(1, 19), (2, 29), (4, 17), (5, 24)]),
            (4, &[(1, 15), (2, 12), (3, 28), (5, 14)]),
            (5, &[(1, 23), (2, 27), (3, 21), (4, 31)]),
        ])
    }

    /// Example 12 of Schulze's paper (arXiv:1804.02973), with A..E numbered 1..5.
    pub fn paper_example_ballots() -> Vec<Ballot> {
        let mut res = Vec::new();
        res.extend(repeat(9, &[1, 4, 2, 5, 3]));
        res.extend(repeat(1, &[2, 1, 3, 5, 4]));
        res.extend(repeat(6, &[3, 2, 1, 4, 5]));
        res.extend(repeat(2, &[3, 4, 2, 5, 1]));
        res.extend(repeat(5, &[3, 4, 5, 1, 2]));
        res.extend(repeat(6, &[4, 5, 3, 1, 2]));
        res.extend(repeat(14, &[5, 2, 1, 3, 4]));
        res.extend(repeat(2, &[5, 2, 3, 1, 4]));
        res
    }

    pub fn paper_example_preferences() -> Matrix {
        Matrix::from_rows(&[
            (1, &[(2, 20), (3, 24), (4, 32), (5, 16)]),
            (2, &[(1, 25), (3, 26), (4, 23), (5, 18)]),
            (3, &[(1, 21), (2, 19), (4, 30), (5, 14)]),
            (4, &[(1, 13), (2, 22), (3, 15), (5, 28)]),
            (5, &[(1, 29), (2, 27), (3, 31), (4, 17)]),
        ])
    }

    #[test]
    fn simple_cycle() {
        let ballots = vec![
            Ballot::new("a", &[1, 2, 3]),
            Ballot::new("b", &[2, 3, 1]),
            Ballot::new("c", &[3, 1, 2]),
        ];
        let m = compute_preferences(&ballots, &ids(&[1, 2, 3]));
        let expected = Matrix::from_rows(&[
            (1, &[(2, 2), (3, 1)]),
            (2, &[(1, 1), (3, 2)]),
            (3, &[(1, 2), (2, 1)]),
        ]);
        assert_eq!(m, expected);
    }

    #[test]
    fn wikipedia_example() {
        let m = compute_preferences(&wikipedia_ballots(), &ids(&[1, 2, 3, 4, 5]));
        assert_eq!(m, wikipedia_preferences());
    }

    #[test]
    fn paper_example() {
        let m = compute_preferences(&paper_example_ballots(), &ids(&[1, 2, 3, 4, 5]));
        assert_eq!(m, paper_example_preferences());
    }

    #[test]
    fn one_candidate_has_an_empty_row() {
        let ballots = vec![Ballot::new("a", &[1]), Ballot::new("b", &[1])];
        let m = compute_preferences(&ballots, &ids(&[1]));
        assert_eq!(m, Matrix::from_rows(&[(1, &[])]));
        assert_eq!(m.candidates(), ids(&[1]));
    }

    #[test]
    fn no_candidates() {
        let ballots = vec![Ballot::new("a", &[])];
        let m = compute_preferences(&ballots, &[]);
        assert!(m.is_empty());
    }

    #[test]
    fn no_votes_gives_zeros() {
        let m = compute_preferences(&[], &ids(&[1, 2, 3]));
        assert_eq!(m.entry(CandidateId(1), CandidateId(2)), Some(0));
        assert_eq!(m.entry(CandidateId(3), CandidateId(1)), Some(0));
        assert_eq!(m.entry(CandidateId(1), CandidateId(1)), None);
    }

    #[test]
    fn partial_ballots_only_count_ranked_pairs() {
        let ballots = vec![Ballot::new("a", &[3, 1]), Ballot::new("b", &[2])];
        let m = compute_preferences(&ballots, &ids(&[1, 2, 3]));
        assert_eq!(m.get(CandidateId(3), CandidateId(1)), 1);
        assert_eq!(m.get(CandidateId(1), CandidateId(3)), 0);
        assert_eq!(m.get(CandidateId(2), CandidateId(1)), 0);
        assert_eq!(m.get(CandidateId(1), CandidateId(2)), 0);
    }

    #[test]
    fn serializes_as_nested_maps() {
        let m = Matrix::from_rows(&[(1, &[(2, 3)]), (2, &[(1, 0)])]);
        let js = serde_json::to_string(&m).unwrap();
        assert_eq!(js, r#"{"1":{"2":3},"2":{"1":0}}"#);
        let back: Matrix = serde_json::from_str(&js).unwrap();
        assert_eq!(back, m);
    }

    /// Random partial rankings over candidates 1..=5, without repeated ids.
    pub fn ballots_strategy() -> impl Strategy<Value = Vec<Ballot>> {
        prop::collection::vec(prop::collection::vec(1u32..6, 0..6), 0..24).prop_map(|rows| {
            rows.iter()
                .enumerate()
                .map(|(idx, row)| {
                    let mut seen: Vec<u32> = Vec::new();
                    for x in row.iter() {
                        if !seen.contains(x) {
                            seen.push(*x);
                        }
                    }
                    Ballot::new(&format!("v{}", idx), &seen)
                })
                .collect()
        })
    }

    /// Random preference tables over candidates 1..=n, for n up to 6.
    pub fn matrix_strategy() -> impl Strategy<Value = (Vec<CandidateId>, Matrix)> {
        (1usize..7, prop::collection::vec(0u64..12, 36)).prop_map(|(n, values)| {
            let cands: Vec<CandidateId> = (1..=n as u32).map(CandidateId).collect();
            let mut m = Matrix::zeroed(&cands);
            for (a, &c1) in cands.iter().enumerate() {
                for (b, &c2) in cands.iter().enumerate() {
                    if a != b {
                        m.set(c1, c2, values[a * 6 + b]);
                    }
                }
            }
            (cands, m)
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

        #[test]
        fn pairwise_counts_bounded_by_ballots_ranking_both(ballots in ballots_strategy()) {
            let cands = ids(&[1, 2, 3, 4, 5]);
            let m = compute_preferences(&ballots, &cands);
            for &a in cands.iter() {
                for &b in cands.iter() {
                    if a == b {
                        continue;
                    }
                    let both = ballots
                        .iter()
                        .filter(|bal| bal.ranking.contains(&a) && bal.ranking.contains(&b))
                        .count() as u64;
                    prop_assert!(m.get(a, b) + m.get(b, a) <= both);
                }
            }
        }
    }
}
