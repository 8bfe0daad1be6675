use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::candidate_store::{parse_id, parse_symbol};
use crate::error::{Error, StoreError};
use crate::models::{Symbol, Voter, VoterId};
use crate::table::{self, Column, Row};

const YES: &str = "Yes";
const NO: &str = "No";
const NOT_VOTED: &str = "N/A";

impl Row for Voter {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", 10),
        Column::new("Name", 30),
        Column::new("HasVoted", 15),
        Column::new("VotedFor", 20),
    ];

    fn cells(&self) -> Vec<String> {
        let (has_voted, voted_for) = match self.voted_for {
            Some(symbol) => (YES, symbol.to_string()),
            None => (NO, NOT_VOTED.to_string()),
        };
        vec![self.id.to_string(), self.name.clone(), has_voted.to_string(), voted_for]
    }

    fn from_cells(cells: &[&str]) -> Result<Self, String> {
        let id = parse_id(cells[0])?;
        if cells[1].is_empty() {
            return Err("voter name is empty".into());
        }
        let voted_for = match (cells[2], cells[3]) {
            (NO, NOT_VOTED) => None,
            (YES, symbol) => Some(parse_symbol(symbol)?),
            (has_voted, voted_for) => {
                return Err(format!("inconsistent ballot {:?} / {:?}", has_voted, voted_for));
            }
        };
        Ok(Voter { id: VoterId(id), name: cells[1].to_string(), voted_for })
    }
}

/// Registered voters in registration order, mirrored to a table file.
#[derive(Debug)]
pub struct VoterStore {
    path: PathBuf,
    voters: Vec<Voter>,
    by_id: HashMap<VoterId, usize>,
    next_id: u32,
}

impl VoterStore {
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), voters: Vec::new(), by_id: HashMap::new(), next_id: 1 }
    }

    /// Loads the voter file with the same rules as the candidate store.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let mut store = Self::empty(path);

        let text = match table::read(&store.path) {
            Ok(Some(text)) => text,
            Ok(None) => {
                warn!("{} not found. A new file will be created.", store.path.display());
                return store;
            }
            Err(e) => {
                warn!("Voter data not loaded, starting empty: {}", e);
                return store;
            }
        };

        let (rows, issues) = table::parse::<Voter>(&text);
        for issue in issues {
            warn!("Skipping voter row in {}: {}", store.path.display(), issue);
        }
        for voter in rows {
            if store.by_id.contains_key(&voter.id) {
                warn!("Skipping voter row in {}: duplicate id {}", store.path.display(), voter.id);
                continue;
            }
            store.next_id = store.next_id.max(voter.id.0 + 1);
            store.by_id.insert(voter.id, store.voters.len());
            store.voters.push(voter);
        }

        info!("Loaded {} voters from {}", store.voters.len(), store.path.display());
        store
    }

    pub fn save(&self) -> Result<(), StoreError> {
        table::write(&self.path, &table::render(&self.voters))?;
        debug!("Wrote {} voters to {}", self.voters.len(), self.path.display());
        Ok(())
    }

    pub fn find_by_id(&self, id: VoterId) -> Option<&Voter> {
        self.by_id.get(&id).map(|&idx| &self.voters[idx])
    }

    pub(crate) fn insert(&mut self, name: String) -> Result<&Voter, Error> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or_else(|| {
            Error::limit_reached("No voter IDs are left.", format!("next id {}", id))
        })?;

        let idx = self.voters.len();
        self.by_id.insert(VoterId(id), idx);
        self.voters.push(Voter::new(VoterId(id), name));
        Ok(&self.voters[idx])
    }

    /// Records the voter's ballot. Returns `None` for an unknown voter and
    /// leaves an existing ballot untouched.
    pub(crate) fn record_ballot(&mut self, id: VoterId, symbol: Symbol) -> Option<&Voter> {
        let idx = *self.by_id.get(&id)?;
        let voter = &mut self.voters[idx];
        if voter.voted_for.is_none() {
            voter.voted_for = Some(symbol);
        }
        Some(&*voter)
    }

    pub fn len(&self) -> usize {
        self.voters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }

    pub fn ballots_cast(&self) -> usize {
        self.voters.iter().filter(|v| v.has_voted()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::tests::scratch_dir;

    #[test]
    fn round_trips_ballots() {
        let dir = scratch_dir();
        let path = dir.join("voters.txt");
        let mut store = VoterStore::empty(&path);
        let cid = store.insert("Cid the Elder".into()).unwrap().id;
        store.insert("Dee".into()).unwrap();
        store.record_ballot(cid, Symbol::new('A').unwrap());
        store.save().unwrap();

        let loaded = VoterStore::load(&path);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.find_by_id(cid), store.find_by_id(cid));
        assert_eq!(loaded.find_by_id(VoterId(2)).unwrap().voted_for, None);
        assert_eq!(loaded.ballots_cast(), 1);
    }

    #[test]
    fn renders_yes_no_and_placeholder() {
        let dir = scratch_dir();
        let path = dir.join("voters.txt");
        let mut store = VoterStore::empty(&path);
        store.insert("Cid".into()).unwrap();
        store.insert("Dee".into()).unwrap();
        store.record_ballot(VoterId(2), Symbol::new('B').unwrap());
        store.save().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "-".repeat(75));
        assert_eq!(lines[2], format!("{:<10}{:<30}{:<15}{:<20}", 1, "Cid", "No", "N/A"));
        assert_eq!(lines[3], format!("{:<10}{:<30}{:<15}{:<20}", 2, "Dee", "Yes", "B"));
    }

    #[test]
    fn ballot_is_never_overwritten() {
        let mut store = VoterStore::empty("unused.txt");
        let id = store.insert("Cid".into()).unwrap().id;
        store.record_ballot(id, Symbol::new('A').unwrap());
        let voter = store.record_ballot(id, Symbol::new('B').unwrap()).unwrap();
        assert_eq!(voter.voted_for, Symbol::new('A'));
        assert!(store.record_ballot(VoterId(9), Symbol::new('A').unwrap()).is_none());
    }

    #[test]
    fn rejects_inconsistent_rows_and_resumes_ids() {
        let dir = scratch_dir();
        let path = dir.join("voters.txt");
        let text = format!(
            "header\nrule\n{:<10}{:<30}{:<15}{:<20}\n{:<10}{:<30}{:<15}{:<20}\n{:<10}{:<30}{:<15}{:<20}\n",
            4, "Cid", "No", "N/A",
            5, "Dee", "Yes", "N/A",
            9, "Eve", "No", "A",
        );
        std::fs::write(&path, text).unwrap();

        let mut store = VoterStore::load(&path);
        assert_eq!(store.len(), 1);
        assert_eq!(store.insert("Fay".into()).unwrap().id, VoterId(5));
    }

    #[test]
    fn ids_stop_short_of_the_top_value() {
        let dir = scratch_dir();
        let path = dir.join("voters.txt");
        let text = format!(
            "header\nrule\n{:<10}{:<30}{:<15}{:<20}\n{:<10}{:<30}{:<15}{:<20}\n",
            u32::MAX, "Max", "No", "N/A",
            u32::MAX - 1, "Penny", "No", "N/A",
        );
        std::fs::write(&path, text).unwrap();

        let mut store = VoterStore::load(&path);
        assert_eq!(store.len(), 1);
        assert!(store.find_by_id(VoterId(u32::MAX)).is_none());

        let err = store.insert("Fay".into()).unwrap_err();
        assert!(err.is(ErrorCode::LimitReached));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unreadable_path_gives_empty_store() {
        let dir = scratch_dir();
        let store = VoterStore::load(&dir);
        assert!(store.is_empty());
        assert_eq!(store.ballots_cast(), 0);
    }
}
