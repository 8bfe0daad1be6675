use tracing::{error, info, instrument, warn};

use crate::candidate_store::CandidateStore;
use crate::config::StorageConfig;
use crate::error::{Error, ErrorCode, Result, StoreError};
use crate::models::*;
use crate::validation::validate_name;
use crate::voter_store::VoterStore;

/// Owns the candidate and voter registries for one election and keeps the
/// table files in step with every change.
///
/// Every vote is counted on the candidate and recorded on the voter inside a
/// single `&mut self` call, so a voter can never get a second ballot in.
/// The two files are still written one after the other: a crash between the
/// writes leaves them disagreeing, which [`ElectionService::audit`] reports.
#[derive(Debug)]
pub struct ElectionService {
    candidates: CandidateStore,
    voters: VoterStore,
}

impl ElectionService {
    pub fn open(config: &StorageConfig) -> Self {
        let service = Self::from_stores(
            CandidateStore::load(&config.candidate_file),
            VoterStore::load(&config.voter_file),
        );

        let audit = service.audit();
        if !audit.is_consistent() {
            warn!(
                "Stored records disagree: candidates hold {} votes but {} voters are marked as voted",
                audit.tallied_votes, audit.ballots_recorded
            );
        }
        service
    }

    pub fn from_stores(candidates: CandidateStore, voters: VoterStore) -> Self {
        Self { candidates, voters }
    }

    #[instrument(skip(self))]
    pub fn register_candidate(&mut self, name: &str, symbol: Symbol) -> Result<Committed<Candidate>> {
        let name = validate_name(name)?;
        if !self.candidates.is_symbol_unique(symbol) {
            return Err(Error::with_details(
                ErrorCode::DuplicateSymbol,
                "Symbol already in use. Please choose a different one.",
                format!("symbol {}", symbol),
            ));
        }

        let record = self.candidates.insert(name, symbol)?.clone();
        info!("Registered candidate {} ({}) with symbol {}", record.name, record.id, record.symbol);
        let save_error = Self::persist("candidate", self.candidates.save());
        Ok(Committed { record, save_error })
    }

    #[instrument(skip(self))]
    pub fn register_voter(&mut self, name: &str) -> Result<Committed<Voter>> {
        let name = validate_name(name)?;
        let record = self.voters.insert(name)?.clone();
        info!("Registered voter {} ({})", record.name, record.id);
        let save_error = Self::persist("voter", self.voters.save());
        Ok(Committed { record, save_error })
    }

    #[instrument(skip(self))]
    pub fn cast_vote(&mut self, voter_id: VoterId, symbol: Symbol) -> Result<Committed<VoteReceipt>> {
        let voter_name = self.eligible_voter(voter_id)?.name.clone();

        let candidate = self.candidates.record_vote(symbol)?
            .ok_or_else(|| candidate_not_found(symbol))?
            .clone();
        self.voters.record_ballot(voter_id, symbol);
        info!("Voter {} cast a vote for {} ({})", voter_id, candidate.name, symbol);

        let candidate_save = Self::persist("candidate", self.candidates.save());
        let voter_save = Self::persist("voter", self.voters.save());

        Ok(Committed {
            record: VoteReceipt { voter_id, voter_name, candidate },
            save_error: candidate_save.or(voter_save),
        })
    }

    /// The voter, if they exist and have not voted yet.
    pub fn eligible_voter(&self, voter_id: VoterId) -> Result<&Voter> {
        let voter = self.voters.find_by_id(voter_id).ok_or_else(|| voter_not_found(voter_id))?;
        if voter.has_voted() {
            return Err(Error::with_details(
                ErrorCode::AlreadyVoted,
                format!("You have already voted, {}.", voter.name),
                format!("voter {}", voter_id),
            ));
        }
        Ok(voter)
    }

    /// Current standings in registration order.
    pub fn results(&self) -> Result<ResultsReport> {
        if self.candidates.is_empty() {
            return Err(Error::new(ErrorCode::EmptyCandidateList, "No candidates registered yet."));
        }

        let candidates: Vec<Candidate> = self.candidates.iter().cloned().collect();
        let total_votes = self.candidates.total_votes();
        let top = candidates.iter().map(|c| c.votes).max().unwrap_or(0);
        let leaders = if top == 0 {
            Vec::new()
        } else {
            candidates.iter().filter(|c| c.votes == top).map(|c| c.id).collect()
        };

        let registered_voters = self.voters.len();
        let turnout_percent = if registered_voters == 0 {
            0.0
        } else {
            self.voters.ballots_cast() as f64 * 100.0 / registered_voters as f64
        };

        Ok(ResultsReport { candidates, total_votes, registered_voters, turnout_percent, leaders })
    }

    pub fn vote_of(&self, voter_id: VoterId) -> Result<VoteStatus> {
        let voter = self.voters.find_by_id(voter_id).ok_or_else(|| voter_not_found(voter_id))?;
        let Some(symbol) = voter.voted_for else {
            return Ok(VoteStatus::NotVoted { voter: voter.clone() });
        };

        let candidate = self.candidates.find_by_symbol(symbol).ok_or_else(|| candidate_not_found(symbol))?;
        Ok(VoteStatus::Voted { voter: voter.clone(), candidate: candidate.clone() })
    }

    pub fn candidates(&self) -> &[Candidate] {
        self.candidates.as_slice()
    }

    pub fn find_voter(&self, voter_id: VoterId) -> Option<&Voter> {
        self.voters.find_by_id(voter_id)
    }

    pub fn is_symbol_available(&self, symbol: Symbol) -> bool {
        self.candidates.is_symbol_unique(symbol)
    }

    pub fn audit(&self) -> Audit {
        Audit {
            tallied_votes: self.candidates.total_votes(),
            ballots_recorded: self.voters.ballots_cast(),
        }
    }

    fn persist(table: &str, outcome: std::result::Result<(), StoreError>) -> Option<Error> {
        outcome.err().map(|e| {
            error!("Unable to save {} data, changes are kept in memory only: {}", table, e);
            Error::from(e)
        })
    }
}

fn voter_not_found(voter_id: VoterId) -> Error {
    Error::with_details(ErrorCode::VoterNotFound, "Voter not found.", format!("voter {}", voter_id))
}

fn candidate_not_found(symbol: Symbol) -> Error {
    Error::with_details(ErrorCode::CandidateNotFound, "Invalid candidate symbol.", format!("symbol {}", symbol))
}
