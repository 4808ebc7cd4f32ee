// Tie-breaking between potential winners by removing weakest links.
//
// Reference: M. Schulze, "The Schulze Method of Voting", section 5
// (https://arxiv.org/pdf/1804.02973).

use log::{debug, info};

use crate::config::CandidateId;
use crate::matrix::Matrix;
use crate::paths::compute_strongest_paths;

/// A directed link between two candidates.
pub type Link = (CandidateId, CandidateId);

/// One pairwise decision taken while breaking a tie.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Resolution {
    pub winner: CandidateId,
    pub loser: CandidateId,
    /// The weakest links that were removed, in order, before the pair was decided.
    pub removed_links: Vec<Link>,
}

/// The outcome of the tie-breaker.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TieBreak {
    /// The candidates still tied. A single candidate if the tie was broken.
    pub winners: Vec<CandidateId>,
    pub resolutions: Vec<Resolution>,
}

struct WeakestLinkSearch<'a> {
    preferences: &'a Matrix,
    candidates: &'a [CandidateId],
    end: CandidateId,
    strength: u64,
    visited: Vec<CandidateId>,
    links: Vec<Link>,
}

impl<'a> WeakestLinkSearch<'a> {
    fn explore(&mut self, current: CandidateId, path: &mut Vec<CandidateId>) {
        if current == self.end {
            self.record(path);
            return;
        }
        self.visited.push(current);
        for &next in self.candidates.iter() {
            if self.visited.contains(&next) {
                continue;
            }
            if self.preferences.get(current, next) > self.preferences.get(next, current) {
                path.push(next);
                self.explore(next, path);
                path.pop();
            }
        }
        self.visited.pop();
    }

    fn record(&mut self, path: &[CandidateId]) {
        let weakest = path
            .windows(2)
            .map(|w| self.preferences.get(w[0], w[1]))
            .min();
        if weakest != Some(self.strength) {
            return;
        }
        for w in path.windows(2) {
            let link = (w[0], w[1]);
            if self.preferences.get(w[0], w[1]) == self.strength && !self.links.contains(&link) {
                self.links.push(link);
            }
        }
    }
}

/// Finds the links that limit the strongest paths from `start` to `end`.
///
/// All the simple paths from `start` to `end` are enumerated. Among the paths as strong
/// as the strongest path, the links whose strength equals that of the strongest path are
/// returned, without repetition and in the order they are discovered.
pub fn find_weakest_edges(
    preferences: &Matrix,
    strongest_paths: &Matrix,
    start: CandidateId,
    end: CandidateId,
    candidates: &[CandidateId],
) -> Vec<Link> {
    if start == end {
        return Vec::new();
    }
    let mut search = WeakestLinkSearch {
        preferences,
        candidates,
        end,
        strength: strongest_paths.get(start, end),
        visited: Vec::new(),
        links: Vec::new(),
    };
    let mut path = vec![start];
    search.explore(start, &mut path);
    search.links
}

/// Tries to decide between c1 and c2 by removing their common weakest links one at a
/// time. Works on copies of the matrices.
fn resolve_pair(
    c1: CandidateId,
    c2: CandidateId,
    candidates: &[CandidateId],
    preferences: &Matrix,
    strongest_paths: &Matrix,
) -> Option<Resolution> {
    let mut prefs = preferences.clone();
    let mut paths = strongest_paths.clone();
    let mut removed_links: Vec<Link> = Vec::new();
    loop {
        let links_12 = find_weakest_edges(&prefs, &paths, c1, c2, candidates);
        let links_21 = find_weakest_edges(&prefs, &paths, c2, c1, candidates);
        let common: Vec<Link> = links_12
            .iter()
            .filter(|l| links_21.contains(l))
            .cloned()
            .collect();
        debug!(
            "resolve_pair: {} vs {}: weakest links {:?} / {:?}, common {:?}",
            c1, c2, links_12, links_21, common
        );
        let (x, y) = match common.first() {
            Some(link) => *link,
            None => return None,
        };
        prefs.set(x, y, 0);
        removed_links.push((x, y));
        paths = compute_strongest_paths(&prefs, candidates);
        let p12 = paths.get(c1, c2);
        let p21 = paths.get(c2, c1);
        if p12 > p21 {
            return Some(Resolution {
                winner: c1,
                loser: c2,
                removed_links,
            });
        }
        if p12 < p21 {
            return Some(Resolution {
                winner: c2,
                loser: c1,
                removed_links,
            });
        }
    }
}

/// Breaks a tie between potential winners.
///
/// Pairs of tied candidates are examined in order of their position in `tied`. The first
/// pair that can be decided removes its loser, and the search restarts from the first
/// pair with the original matrices. When no pair can be decided, the remaining candidates
/// are returned. The matrices passed in are never modified.
pub fn break_ties(
    tied: &[CandidateId],
    candidates: &[CandidateId],
    preferences: &Matrix,
    strongest_paths: &Matrix,
) -> TieBreak {
    let mut remaining: Vec<CandidateId> = tied.to_vec();
    let mut resolutions: Vec<Resolution> = Vec::new();
    'rounds: while remaining.len() > 1 {
        for i in 0..remaining.len() - 1 {
            for j in (i + 1)..remaining.len() {
                let (c1, c2) = (remaining[i], remaining[j]);
                if let Some(res) =
                    resolve_pair(c1, c2, candidates, preferences, strongest_paths)
                {
                    info!(
                        "break_ties: {} defeats {} after removing {:?}",
                        res.winner, res.loser, res.removed_links
                    );
                    let loser_idx = if res.loser == c2 { j } else { i };
                    remaining.remove(loser_idx);
                    resolutions.push(res);
                    continue 'rounds;
                }
            }
        }
        info!("break_ties: irreducible tie between {:?}", remaining);
        break;
    }
    TieBreak {
        winners: remaining,
        resolutions,
    }
}
