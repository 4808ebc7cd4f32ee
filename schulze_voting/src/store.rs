use log::debug;

use crate::config::*;

/// Access to the data of an election.
///
/// The engine reads candidates and ballots from the store, and writes its results back.
/// Storage failures should be reported as `VotingErrors::Store`.
pub trait ElectionStore {
    /// The candidates allowed to run. Ineligible candidates are never returned.
    fn eligible_candidates(&self) -> Result<Vec<Candidate>, VotingErrors>;

    fn ballots(&self) -> Result<Vec<Ballot>, VotingErrors>;

    fn candidate_by_id(&self, id: CandidateId) -> Result<Candidate, VotingErrors>;

    /// The results saved so far, in the order they were first saved.
    fn results(&self) -> Result<Vec<ElectionResult>, VotingErrors>;

    /// Saves a result. A result for the same scope is replaced.
    fn save_result(&mut self, result: ElectionResult) -> Result<(), VotingErrors>;
}

/// An election held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    candidates: Vec<Candidate>,
    ballots: Vec<Ballot>,
    results: Vec<ElectionResult>,
}

impl MemoryStore {
    pub fn new(candidates: Vec<Candidate>, ballots: Vec<Ballot>) -> MemoryStore {
        MemoryStore {
            candidates,
            ballots,
            results: Vec::new(),
        }
    }
}

impl ElectionStore for MemoryStore {
    fn eligible_candidates(&self) -> Result<Vec<Candidate>, VotingErrors> {
        Ok(self
            .candidates
            .iter()
            .filter(|c| c.eligible)
            .cloned()
            .collect())
    }

    fn ballots(&self) -> Result<Vec<Ballot>, VotingErrors> {
        Ok(self.ballots.clone())
    }

    fn candidate_by_id(&self, id: CandidateId) -> Result<Candidate, VotingErrors> {
        self.candidates
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(VotingErrors::UnknownCandidate { candidate: id })
    }

    fn results(&self) -> Result<Vec<ElectionResult>, VotingErrors> {
        Ok(self.results.clone())
    }

    fn save_result(&mut self, result: ElectionResult) -> Result<(), VotingErrors> {
        debug!("save_result: {} {:?}", result.scope, result.winners);
        match self.results.iter_mut().find(|r| r.scope == result.scope) {
            Some(existing) => *existing = result,
            None => self.results.push(result),
        }
        Ok(())
    }
}
