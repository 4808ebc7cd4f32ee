// ********* Input data structures ***********

use serde::{Deserialize, Serialize};
use snafu::Snafu;
use std::fmt::Display;

use crate::matrix::Matrix;

/// The identifier of a candidate.
///
/// Identifiers are stable integers assigned by the registration system (six-digit
/// student codes in practice). They are displayed zero-padded to six digits.
#[derive(
    Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct CandidateId(pub u32);

impl Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

impl From<u32> for CandidateId {
    fn from(x: u32) -> Self {
        CandidateId(x)
    }
}

/// A registered candidate.
///
/// The engine only ever sees eligible candidates: eligibility is decided by
/// whoever registers candidates, and the store is expected to filter on it.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    /// The contest scope (course, category) this candidate runs in.
    pub scope: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_eligible")]
    pub eligible: bool,
}

fn default_eligible() -> bool {
    true
}

impl Candidate {
    pub fn new(id: u32, name: &str, scope: &str) -> Candidate {
        Candidate {
            id: CandidateId(id),
            name: name.to_string(),
            scope: scope.to_string(),
            description: String::new(),
            eligible: true,
        }
    }
}

/// One voter's ranking, from the most preferred candidate to the least preferred.
///
/// A ballot may rank only a subset of the candidates: the candidates that are not
/// mentioned are simply not compared against the others for this ballot.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Ballot {
    pub voter: String,
    pub ranking: Vec<CandidateId>,
}

impl Ballot {
    pub fn new(voter: &str, ranking: &[u32]) -> Ballot {
        Ballot {
            voter: voter.to_string(),
            ranking: ranking.iter().map(|x| CandidateId(*x)).collect(),
        }
    }
}

// ******** Output data structures *********

/// How the winners of a result were determined.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// A single candidate beats or ties every other candidate in the strongest paths.
    #[serde(rename = "absolute")]
    Absolute,
    /// Several candidates were tied, and the weakest-link procedure left one of them.
    #[serde(rename = "tie-breaker")]
    TieBreaker,
    /// The tie could not be broken: all the remaining candidates are reported.
    #[serde(rename = "tie")]
    Tie,
    /// The ranked order for the at-large seats.
    #[serde(rename = "common")]
    Common,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Absolute => "absolute",
            Stage::TieBreaker => "tie-breaker",
            Stage::Tie => "tie",
            Stage::Common => "common",
        };
        write!(f, "{}", s)
    }
}

/// The outcome of one contest scope, or of the at-large allocation.
///
/// For a scope, `winners` holds a single candidate unless the tie was irreducible.
/// For the at-large allocation, `winners` is the strict order of the seats.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionResult {
    pub scope: String,
    pub winners: Vec<CandidateId>,
    pub preferences: Matrix,
    pub strongest_paths: Matrix,
    pub stage: Stage,
}

/// Errors that prevent the algorithm from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum VotingErrors {
    #[snafu(display("no candidates in the election"))]
    EmptyElection {},
    #[snafu(display("candidate {candidate} is registered more than once"))]
    DuplicateCandidateId { candidate: CandidateId },
    #[snafu(display("ballot {voter} ranks candidate {candidate} more than once"))]
    DuplicateRanking {
        voter: String,
        candidate: CandidateId,
    },
    #[snafu(display("candidate {candidate} is not registered"))]
    UnknownCandidate { candidate: CandidateId },
    #[snafu(display("no potential winner for scope {scope}"))]
    NoPotentialWinner { scope: String },
    #[snafu(display("scope {scope} has {count} winners, expected exactly one"))]
    AmbiguousScopeResult { scope: String, count: usize },
    #[snafu(display("no seats left: {total} seats for {excluded} scope winners"))]
    NoSeatsLeft { total: u32, excluded: usize },
    #[snafu(display("no candidates left for the common seats"))]
    NoCommonCandidates {},
    #[snafu(display("the common seats cannot use {scope}, it is already the scope of a candidate"))]
    CommonScopeClash { scope: String },
    #[snafu(display("no strict order: irreducible tie between {:?}", remaining))]
    IrreducibleTie { remaining: Vec<CandidateId> },
    #[snafu(display("election store failure: {message}"))]
    Store { message: String },
}

// ********* Configuration **********

/// The rules passed to every computation. There is no process-wide state.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ElectionRules {
    /// The total number of seats: one per scope winner, the rest at large.
    pub total_seats: u32,
    /// The scope label of the at-large result.
    pub common_scope_name: String,
}

impl ElectionRules {
    pub const DEFAULT_COMMON_SCOPE: &'static str = "Common seats";

    pub fn new(total_seats: u32) -> ElectionRules {
        ElectionRules {
            total_seats,
            common_scope_name: ElectionRules::DEFAULT_COMMON_SCOPE.to_string(),
        }
    }
}
