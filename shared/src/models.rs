use serde::{Serialize, Deserialize};
use std::fmt;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(pub u32);

/// A candidate's ballot mark. Never whitespace or a control character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(char);

impl Symbol {
    pub fn new(c: char) -> Option<Self> {
        if c.is_whitespace() || c.is_control() { None } else { Some(Self(c)) }
    }

    pub const fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub symbol: Symbol,
    pub votes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voter {
    pub id: VoterId,
    pub name: String,
    pub voted_for: Option<Symbol>,
}

impl Candidate {
    pub fn new(id: CandidateId, name: String, symbol: Symbol) -> Self {
        Self { id, name, symbol, votes: 0 }
    }
}

impl Voter {
    pub fn new(id: VoterId, name: String) -> Self {
        Self { id, name, voted_for: None }
    }

    pub fn has_voted(&self) -> bool {
        self.voted_for.is_some()
    }
}

/// A mutation's result together with the outcome of its write-through save.
#[derive(Debug, Clone)]
pub struct Committed<T> {
    pub record: T,
    pub save_error: Option<Error>,
}

impl<T> Committed<T> {
    pub fn is_durable(&self) -> bool {
        self.save_error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    pub voter_id: VoterId,
    pub voter_name: String,
    pub candidate: Candidate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum VoteStatus {
    NotVoted { voter: Voter },
    Voted { voter: Voter, candidate: Candidate },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsReport {
    pub candidates: Vec<Candidate>,
    pub total_votes: u64,
    pub registered_voters: usize,
    pub turnout_percent: f64,
    pub leaders: Vec<CandidateId>,
}

impl ResultsReport {
    pub fn is_leader(&self, id: CandidateId) -> bool {
        self.leaders.contains(&id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    pub tallied_votes: u64,
    pub ballots_recorded: usize,
}

impl Audit {
    pub fn is_consistent(&self) -> bool {
        u64::try_from(self.ballots_recorded).is_ok_and(|ballots| ballots == self.tallied_votes)
    }
}
