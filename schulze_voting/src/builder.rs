use log::warn;
use snafu::ensure;
use std::collections::{HashMap, HashSet};

use crate::config::*;
use crate::store::MemoryStore;

/// A builder for assembling an election in memory.
///
/// Ballots are validated as they are added.
///
/// ```
/// use schulze_voting::builder::Builder;
/// use schulze_voting::{Candidate, ElectionStore, VotingErrors};
///
/// let mut builder = Builder::new().candidates(&[
///     Candidate::new(1, "Anna", "course 1"),
///     Candidate::new(2, "Bob", "course 1"),
/// ])?;
///
/// builder.add_ballot("voter-1", &[2, 1])?;
/// assert!(builder.add_ballot("voter-2", &[1, 3]).is_err());
///
/// let store = builder.build();
/// assert_eq!(store.ballots()?.len(), 1);
/// # Ok::<(), VotingErrors>(())
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    candidates: Vec<Candidate>,
    eligibility: HashMap<CandidateId, bool>,
    ballots: Vec<Ballot>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Registers the candidates. Ids must be unique.
    ///
    /// Ballots added before are dropped, since they were checked against other candidates.
    pub fn candidates(self, cands: &[Candidate]) -> Result<Builder, VotingErrors> {
        let mut eligibility: HashMap<CandidateId, bool> = HashMap::new();
        for c in cands.iter() {
            ensure!(
                eligibility.insert(c.id, c.eligible).is_none(),
                DuplicateCandidateIdSnafu { candidate: c.id }
            );
        }
        Ok(Builder {
            candidates: cands.to_vec(),
            eligibility,
            ballots: Vec::new(),
        })
    }

    /// Adds a ballot, from the most preferred candidate to the least preferred.
    ///
    /// Every candidate must be registered and appear at most once. Ineligible candidates
    /// are removed from the ranking. A ballot left empty is not recorded.
    pub fn add_ballot(&mut self, voter: &str, ranking: &[u32]) -> Result<(), VotingErrors> {
        self.add_ballot_2(&Ballot::new(voter, ranking))
    }

    pub fn add_ballot_2(&mut self, ballot: &Ballot) -> Result<(), VotingErrors> {
        let mut seen: HashSet<CandidateId> = HashSet::new();
        let mut ranking: Vec<CandidateId> = Vec::new();
        for &cid in ballot.ranking.iter() {
            ensure!(
                seen.insert(cid),
                DuplicateRankingSnafu {
                    voter: &ballot.voter,
                    candidate: cid,
                }
            );
            match self.eligibility.get(&cid) {
                None => return UnknownCandidateSnafu { candidate: cid }.fail(),
                Some(false) => {
                    warn!(
                        "add_ballot: {}: dropping ineligible candidate {}",
                        ballot.voter, cid
                    );
                }
                Some(true) => ranking.push(cid),
            }
        }
        if ranking.is_empty() {
            warn!("add_ballot: {}: empty ballot", ballot.voter);
            return Ok(());
        }
        self.ballots.push(Ballot {
            voter: ballot.voter.clone(),
            ranking,
        });
        Ok(())
    }

    pub fn build(self) -> MemoryStore {
        MemoryStore::new(self.candidates, self.ballots)
    }
}
