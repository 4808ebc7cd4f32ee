mod config;
mod matrix;
mod paths;
mod scope;
mod store;
mod tiebreak;

pub mod builder;
pub mod manual;

use log::{debug, info};
use snafu::ensure;
use std::collections::{BTreeSet, HashSet};

pub use crate::config::*;
pub use crate::matrix::{compute_preferences, Matrix};
pub use crate::paths::{compute_strongest_paths, find_potential_winners};
pub use crate::scope::{
    exclude_scope_winners, partition_by_scope, restrict_ballots, Residual, ScopeContest,
};
pub use crate::store::{ElectionStore, MemoryStore};
pub use crate::tiebreak::{break_ties, find_weakest_edges, Link, Resolution, TieBreak};

/// Structural checks on what the store returns, before any counting.
fn checks(candidates: &[Candidate], ballots: &[Ballot]) -> Result<(), VotingErrors> {
    debug!(
        "checks: {} candidates, {} ballots",
        candidates.len(),
        ballots.len()
    );
    ensure!(!candidates.is_empty(), EmptyElectionSnafu {});
    let mut seen: HashSet<CandidateId> = HashSet::new();
    for c in candidates.iter() {
        ensure!(
            seen.insert(c.id),
            DuplicateCandidateIdSnafu { candidate: c.id }
        );
    }
    for ballot in ballots.iter() {
        let mut ranked: HashSet<CandidateId> = HashSet::new();
        for cid in ballot.ranking.iter() {
            ensure!(
                ranked.insert(*cid),
                DuplicateRankingSnafu {
                    voter: &ballot.voter,
                    candidate: *cid,
                }
            );
        }
    }
    Ok(())
}

/// Computes the result of a single scope.
///
/// The result holds one winner, unless the tie between the potential winners could not
/// be broken. In that case all the remaining candidates are reported with the `Tie` stage.
pub fn tabulate_scope(contest: &ScopeContest) -> Result<ElectionResult, VotingErrors> {
    info!(
        "tabulate_scope: {}: {} candidates, {} ballots",
        contest.scope,
        contest.candidates.len(),
        contest.ballots.len()
    );
    let preferences = compute_preferences(&contest.ballots, &contest.candidates);
    let strongest_paths = compute_strongest_paths(&preferences, &contest.candidates);
    let potential_winners = find_potential_winners(&strongest_paths, &contest.candidates);

    let (winners, stage) = match potential_winners.len() {
        0 => {
            return NoPotentialWinnerSnafu {
                scope: &contest.scope,
            }
            .fail()
        }
        1 => (potential_winners, Stage::Absolute),
        _ => {
            info!(
                "tabulate_scope: {}: tie between {:?}",
                contest.scope, potential_winners
            );
            let tb = break_ties(
                &potential_winners,
                &contest.candidates,
                &preferences,
                &strongest_paths,
            );
            let stage = if tb.winners.len() == 1 {
                Stage::TieBreaker
            } else {
                Stage::Tie
            };
            (tb.winners, stage)
        }
    };
    info!(
        "tabulate_scope: {}: winners {:?} ({})",
        contest.scope, winners, stage
    );
    Ok(ElectionResult {
        scope: contest.scope.clone(),
        winners,
        preferences,
        strongest_paths,
        stage,
    })
}

/// Computes the result of every scope and saves them in the store.
///
/// The results are returned in the order of the scope names.
pub fn compute_scope_results<S: ElectionStore>(
    store: &mut S,
) -> Result<Vec<ElectionResult>, VotingErrors> {
    let candidates = store.eligible_candidates()?;
    let ballots = store.ballots()?;
    info!(
        "compute_scope_results: {} candidates, {} ballots",
        candidates.len(),
        ballots.len()
    );
    checks(&candidates, &ballots)?;

    let mut results: Vec<ElectionResult> = Vec::new();
    for contest in partition_by_scope(&candidates, &ballots).iter() {
        let result = tabulate_scope(contest)?;
        store.save_result(result.clone())?;
        results.push(result);
    }
    Ok(results)
}

/// Ranks up to `seats` candidates in strict order.
///
/// The matrices are computed again over the remaining candidates after each pick. If a
/// tie cannot be broken, no order is returned at all.
pub fn build_strict_order(
    candidates: &[CandidateId],
    ballots: &[Ballot],
    seats: u32,
) -> Result<Vec<CandidateId>, VotingErrors> {
    let mut remaining: Vec<CandidateId> = candidates.to_vec();
    let mut order: Vec<CandidateId> = Vec::new();
    let mut seats_left = seats;
    while !remaining.is_empty() && seats_left > 0 {
        let keep: BTreeSet<CandidateId> = remaining.iter().cloned().collect();
        let current_ballots = restrict_ballots(ballots, &keep);
        let preferences = compute_preferences(&current_ballots, &remaining);
        let strongest_paths = compute_strongest_paths(&preferences, &remaining);
        let mut winners = find_potential_winners(&strongest_paths, &remaining);
        if winners.len() > 1 {
            winners = break_ties(&winners, &remaining, &preferences, &strongest_paths).winners;
        }
        let winner = match winners.as_slice() {
            [w] => *w,
            [] => return NoPotentialWinnerSnafu { scope: "strict order" }.fail(),
            _ => return IrreducibleTieSnafu { remaining: winners.clone() }.fail(),
        };
        debug!("build_strict_order: position {}: {}", order.len() + 1, winner);
        order.push(winner);
        remaining.retain(|c| *c != winner);
        seats_left -= 1;
    }
    Ok(order)
}

/// Ranks the candidates who did not win a scope for the remaining seats, and saves the
/// ranking in the store.
///
/// The scope results must already be in the store. The result carries the matrices of
/// all the remaining candidates before any of them is picked.
pub fn compute_global_allocation<S: ElectionStore>(
    store: &mut S,
    rules: &ElectionRules,
) -> Result<ElectionResult, VotingErrors> {
    let candidates = store.eligible_candidates()?;
    let ballots = store.ballots()?;
    let prior = store.results()?;
    checks(&candidates, &ballots)?;

    let residual = exclude_scope_winners(&candidates, &ballots, &prior, rules)?;
    let preferences = compute_preferences(&residual.ballots, &residual.candidates);
    let strongest_paths = compute_strongest_paths(&preferences, &residual.candidates);
    let order = build_strict_order(&residual.candidates, &residual.ballots, residual.seats)?;
    info!(
        "compute_global_allocation: {} seats without the scope winners {:?}: {:?}",
        residual.seats, residual.excluded, order
    );

    let result = ElectionResult {
        scope: rules.common_scope_name.clone(),
        winners: order,
        preferences,
        strongest_paths,
        stage: Stage::Common,
    };
    store.save_result(result.clone())?;
    Ok(result)
}
