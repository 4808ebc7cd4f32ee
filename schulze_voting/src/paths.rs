use log::debug;

use crate::config::CandidateId;
use crate::matrix::Matrix;

/// Computes the strongest (widest) paths between every pair of candidates.
///
/// A direct link A -> B exists only if more voters prefer A over B than B over A, and its
/// strength is the number of voters preferring A. The strength of a path is the strength
/// of its weakest link, and the strongest path between two candidates is the one with the
/// largest strength. Pairs without a path have a strength of 0.
pub fn compute_strongest_paths(preferences: &Matrix, candidates: &[CandidateId]) -> Matrix {
    let mut paths = Matrix::zeroed(candidates);
    for &c1 in candidates.iter() {
        for &c2 in candidates.iter() {
            if c1 == c2 {
                continue;
            }
            let d12 = preferences.get(c1, c2);
            let d21 = preferences.get(c2, c1);
            if d12 > d21 {
                paths.set(c1, c2, d12);
            }
        }
    }
    close_paths(&mut paths, candidates);
    debug!("compute_strongest_paths: {:?}", paths);
    paths
}

/// The widest-path closure, with the intermediate candidate in the outer loop.
fn close_paths(paths: &mut Matrix, candidates: &[CandidateId]) {
    for &i in candidates.iter() {
        for &j in candidates.iter() {
            if j == i {
                continue;
            }
            for &k in candidates.iter() {
                if k == i || k == j {
                    continue;
                }
                let ji = paths.get(j, i);
                let ik = paths.get(i, k);
                if ji > 0 && ik > 0 {
                    let through = ji.min(ik);
                    if through > paths.get(j, k) {
                        paths.set(j, k, through);
                    }
                }
            }
        }
    }
}

/// The candidates that no other candidate beats in the strongest paths.
///
/// The order of `candidates` is preserved. For a non-empty set of candidates, there is
/// always at least one such candidate.
pub fn find_potential_winners(paths: &Matrix, candidates: &[CandidateId]) -> Vec<CandidateId> {
    let mut winners: Vec<CandidateId> = Vec::new();
    for &candidate in candidates.iter() {
        let beaten = candidates.iter().any(|&opponent| {
            opponent != candidate && paths.get(opponent, candidate) > paths.get(candidate, opponent)
        });
        if !beaten {
            winners.push(candidate);
        }
    }
    debug!("find_potential_winners: {:?}", winners);
    winners
}
