use log::{debug, info};
use snafu::ensure;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::*;

/// The candidates and the ballots of one contest scope.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScopeContest {
    pub scope: String,
    /// In increasing order.
    pub candidates: Vec<CandidateId>,
    pub ballots: Vec<Ballot>,
}

/// What is left for the at-large seats once the scope winners are removed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Residual {
    pub candidates: Vec<CandidateId>,
    pub ballots: Vec<Ballot>,
    pub seats: u32,
    pub excluded: Vec<CandidateId>,
}

/// Keeps only the given candidates in each ballot, preserving their relative order.
///
/// Ballots left without any candidate are dropped.
pub fn restrict_ballots(ballots: &[Ballot], keep: &BTreeSet<CandidateId>) -> Vec<Ballot> {
    let mut res: Vec<Ballot> = Vec::new();
    for ballot in ballots.iter() {
        let ranking: Vec<CandidateId> = ballot
            .ranking
            .iter()
            .filter(|c| keep.contains(c))
            .cloned()
            .collect();
        if !ranking.is_empty() {
            res.push(Ballot {
                voter: ballot.voter.clone(),
                ranking,
            });
        }
    }
    res
}

/// Splits the candidates by scope, and restricts the ballots to each scope.
///
/// Scopes are returned in the order of their names.
pub fn partition_by_scope(candidates: &[Candidate], ballots: &[Ballot]) -> Vec<ScopeContest> {
    let mut by_scope: BTreeMap<String, BTreeSet<CandidateId>> = BTreeMap::new();
    for c in candidates.iter() {
        by_scope.entry(c.scope.clone()).or_default().insert(c.id);
    }
    by_scope
        .into_iter()
        .map(|(scope, ids)| {
            let scope_ballots = restrict_ballots(ballots, &ids);
            debug!(
                "partition_by_scope: {}: {} candidates, {} ballots",
                scope,
                ids.len(),
                scope_ballots.len()
            );
            ScopeContest {
                scope,
                candidates: ids.into_iter().collect(),
                ballots: scope_ballots,
            }
        })
        .collect()
}

/// Removes the scope winners from the candidates and the ballots, and counts the seats
/// that remain for the at-large allocation.
///
/// Every scope result must have exactly one winner: an unresolved tie does not say which
/// candidate took the scope seat. Results of the at-large allocation are ignored.
///
/// The at-large result is saved under `rules.common_scope_name`, so no candidate may run
/// in a scope with that name.
pub fn exclude_scope_winners(
    candidates: &[Candidate],
    ballots: &[Ballot],
    results: &[ElectionResult],
    rules: &ElectionRules,
) -> Result<Residual, VotingErrors> {
    ensure!(
        !candidates
            .iter()
            .any(|c| c.scope == rules.common_scope_name),
        CommonScopeClashSnafu {
            scope: &rules.common_scope_name
        }
    );
    let mut excluded: BTreeSet<CandidateId> = BTreeSet::new();
    for result in results.iter() {
        if result.stage == Stage::Common {
            continue;
        }
        ensure!(
            result.winners.len() == 1,
            AmbiguousScopeResultSnafu {
                scope: &result.scope,
                count: result.winners.len(),
            }
        );
        excluded.insert(result.winners[0]);
    }
    ensure!(
        (rules.total_seats as usize) > excluded.len(),
        NoSeatsLeftSnafu {
            total: rules.total_seats,
            excluded: excluded.len(),
        }
    );
    let seats = rules.total_seats - excluded.len() as u32;

    let remaining: BTreeSet<CandidateId> = candidates
        .iter()
        .map(|c| c.id)
        .filter(|id| !excluded.contains(id))
        .collect();
    ensure!(!remaining.is_empty(), NoCommonCandidatesSnafu {});

    let residual_ballots = restrict_ballots(ballots, &remaining);
    info!(
        "exclude_scope_winners: excluded {:?}, {} candidates and {} ballots left for {} seats",
        excluded,
        remaining.len(),
        residual_ballots.len(),
        seats
    );
    Ok(Residual {
        candidates: remaining.into_iter().collect(),
        ballots: residual_ballots,
        seats,
        excluded: excluded.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::tests::ids;
    use crate::matrix::Matrix;

    fn result(scope: &str, winners: &[u32], stage: Stage) -> ElectionResult {
        ElectionResult {
            scope: scope.to_string(),
            winners: ids(winners),
            preferences: Matrix::default(),
            strongest_paths: Matrix::default(),
            stage,
        }
    }

    fn eleven_candidates() -> Vec<Candidate> {
        (1..=11)
            .map(|x| Candidate::new(x, &format!("cand{}", x), &format!("course {}", (x + 1) / 2)))
            .collect()
    }

    #[test]
    fn restrict_keeps_order_and_drops_empty() {
        let ballots = vec![
            Ballot::new("a", &[3, 1, 4, 2]),
            Ballot::new("b", &[4]),
            Ballot::new("c", &[2, 3]),
        ];
        let keep: BTreeSet<CandidateId> = ids(&[2, 3]).into_iter().collect();
        let res = restrict_ballots(&ballots, &keep);
        assert_eq!(res, vec![Ballot::new("a", &[3, 2]), Ballot::new("c", &[2, 3])]);
        assert_eq!(ballots[0].ranking, ids(&[3, 1, 4, 2]));
    }

    #[test]
    fn partition_two_scopes() {
        let candidates = vec![
            Candidate::new(202, "Elena", "2 bachelor"),
            Candidate::new(101, "Alice", "1 bachelor"),
            Candidate::new(201, "Dmitri", "2 bachelor"),
            Candidate::new(102, "Boris", "1 bachelor"),
        ];
        let ballots = vec![
            Ballot::new("v1", &[201, 101, 202, 102]),
            Ballot::new("v2", &[102, 101]),
        ];
        let res = partition_by_scope(&candidates, &ballots);
        assert_eq!(
            res,
            vec![
                ScopeContest {
                    scope: "1 bachelor".to_string(),
                    candidates: ids(&[101, 102]),
                    ballots: vec![Ballot::new("v1", &[101, 102]), Ballot::new("v2", &[102, 101])],
                },
                ScopeContest {
                    scope: "2 bachelor".to_string(),
                    candidates: ids(&[201, 202]),
                    ballots: vec![Ballot::new("v1", &[201, 202])],
                },
            ]
        );
    }

    #[test]
    fn exclusion_counts_remaining_seats() {
        let results: Vec<ElectionResult> = [1, 3, 5, 7, 9, 11]
            .iter()
            .enumerate()
            .map(|(idx, w)| result(&format!("course {}", idx + 1), &[*w], Stage::Absolute))
            .collect();
        let ballots = vec![Ballot::new("a", &[1, 2, 3, 4]), Ballot::new("b", &[11, 9])];
        let res =
            exclude_scope_winners(&eleven_candidates(), &ballots, &results, &ElectionRules::new(10))
                .unwrap();
        assert_eq!(res.seats, 4);
        assert_eq!(res.candidates, ids(&[2, 4, 6, 8, 10]));
        assert_eq!(res.excluded, ids(&[1, 3, 5, 7, 9, 11]));
        assert_eq!(res.ballots, vec![Ballot::new("a", &[2, 4])]);
    }

    #[test]
    fn exclusion_ignores_common_results() {
        let results = vec![
            result("course 1", &[1], Stage::TieBreaker),
            result("Common seats", &[2, 4, 6], Stage::Common),
        ];
        let res = exclude_scope_winners(&eleven_candidates(), &[], &results, &ElectionRules::new(3))
            .unwrap();
        assert_eq!(res.seats, 2);
        assert_eq!(res.candidates.len(), 10);
    }

    #[test]
    fn exclusion_rejects_tied_scope() {
        let results = vec![
            result("course 1", &[1], Stage::Absolute),
            result("course 2", &[3, 4], Stage::Tie),
        ];
        let res = exclude_scope_winners(&eleven_candidates(), &[], &results, &ElectionRules::new(10));
        assert_eq!(
            res,
            Err(VotingErrors::AmbiguousScopeResult {
                scope: "course 2".to_string(),
                count: 2
            })
        );
    }

    #[test]
    fn exclusion_without_seats() {
        let results = vec![
            result("course 1", &[1], Stage::Absolute),
            result("course 2", &[3], Stage::Absolute),
        ];
        let res = exclude_scope_winners(&eleven_candidates(), &[], &results, &ElectionRules::new(2));
        assert_eq!(
            res,
            Err(VotingErrors::NoSeatsLeft {
                total: 2,
                excluded: 2
            })
        );
    }

    #[test]
    fn exclusion_rejects_scope_named_like_common_seats() {
        let candidates = vec![
            Candidate::new(1, "a", "Common seats"),
            Candidate::new(2, "b", "Common seats"),
            Candidate::new(3, "c", "y"),
        ];
        let results = vec![
            result("Common seats", &[1], Stage::Absolute),
            result("y", &[3], Stage::Absolute),
        ];
        let res = exclude_scope_winners(&candidates, &[], &results, &ElectionRules::new(3));
        assert_eq!(
            res,
            Err(VotingErrors::CommonScopeClash {
                scope: "Common seats".to_string()
            })
        );

        let mut rules = ElectionRules::new(3);
        rules.common_scope_name = "At large".to_string();
        let res = exclude_scope_winners(&candidates, &[], &results, &rules).unwrap();
        assert_eq!(res.candidates, ids(&[2]));
    }

    #[test]
    fn exclusion_without_candidates() {
        let candidates = vec![Candidate::new(1, "a", "x"), Candidate::new(2, "b", "y")];
        let results = vec![
            result("x", &[1], Stage::Absolute),
            result("y", &[2], Stage::Absolute),
        ];
        let res = exclude_scope_winners(&candidates, &[], &results, &ElectionRules::new(5));
        assert_eq!(res, Err(VotingErrors::NoCommonCandidates {}));
    }
}
