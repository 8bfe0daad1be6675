use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{Error, StoreError};
use crate::models::{Candidate, CandidateId, Symbol};
use crate::table::{self, Column, Row};

impl Row for Candidate {
    const COLUMNS: &'static [Column] = &[
        Column::new("ID", 10),
        Column::new("Name", 30),
        Column::new("Symbol", 15),
        Column::new("Votes", 10),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.symbol.to_string(),
            self.votes.to_string(),
        ]
    }

    fn from_cells(cells: &[&str]) -> Result<Self, String> {
        let id = parse_id(cells[0])?;
        if cells[1].is_empty() {
            return Err("candidate name is empty".into());
        }
        let symbol = parse_symbol(cells[2])?;
        let votes = cells[3].parse().map_err(|_| format!("invalid vote count {:?}", cells[3]))?;
        Ok(Candidate { id: CandidateId(id), name: cells[1].to_string(), symbol, votes })
    }
}

/// Ids run from 1 to `u32::MAX - 1`; the top value is never handed out, so
/// every stored id leaves room for a successor.
pub(crate) fn parse_id(cell: &str) -> Result<u32, String> {
    match cell.parse::<u32>() {
        Ok(0) | Ok(u32::MAX) | Err(_) => Err(format!("invalid id {:?}", cell)),
        Ok(id) => Ok(id),
    }
}

pub(crate) fn parse_symbol(cell: &str) -> Result<Symbol, String> {
    let mut chars = cell.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Symbol::new(c).ok_or_else(|| format!("invalid symbol {:?}", cell)),
        _ => Err(format!("invalid symbol {:?}", cell)),
    }
}

/// Registered candidates in registration order, mirrored to a table file.
#[derive(Debug)]
pub struct CandidateStore {
    path: PathBuf,
    candidates: Vec<Candidate>,
    by_symbol: HashMap<Symbol, usize>,
    next_id: u32,
}

impl CandidateStore {
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), candidates: Vec::new(), by_symbol: HashMap::new(), next_id: 1 }
    }

    /// Loads the candidate file. A missing or unreadable file yields an empty
    /// store; bad rows are skipped. Neither is fatal.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let mut store = Self::empty(path);

        let text = match table::read(&store.path) {
            Ok(Some(text)) => text,
            Ok(None) => {
                warn!("{} not found. A new file will be created.", store.path.display());
                return store;
            }
            Err(e) => {
                warn!("Candidate data not loaded, starting empty: {}", e);
                return store;
            }
        };

        let (rows, issues) = table::parse::<Candidate>(&text);
        for issue in issues {
            warn!("Skipping candidate row in {}: {}", store.path.display(), issue);
        }
        for candidate in rows {
            if let Err(reason) = store.admit(candidate) {
                warn!("Skipping candidate row in {}: {}", store.path.display(), reason);
            }
        }

        info!("Loaded {} candidates from {}", store.candidates.len(), store.path.display());
        store
    }

    fn admit(&mut self, candidate: Candidate) -> Result<(), String> {
        if self.by_symbol.contains_key(&candidate.symbol) {
            return Err(format!("duplicate symbol {}", candidate.symbol));
        }
        if self.find_by_id(candidate.id).is_some() {
            return Err(format!("duplicate id {}", candidate.id));
        }
        self.next_id = self.next_id.max(candidate.id.0 + 1);
        self.by_symbol.insert(candidate.symbol, self.candidates.len());
        self.candidates.push(candidate);
        Ok(())
    }

    pub fn save(&self) -> Result<(), StoreError> {
        table::write(&self.path, &table::render(&self.candidates))?;
        debug!("Wrote {} candidates to {}", self.candidates.len(), self.path.display());
        Ok(())
    }

    pub fn find_by_symbol(&self, symbol: Symbol) -> Option<&Candidate> {
        self.by_symbol.get(&symbol).map(|&idx| &self.candidates[idx])
    }

    pub fn find_by_id(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    pub fn is_symbol_unique(&self, symbol: Symbol) -> bool {
        !self.by_symbol.contains_key(&symbol)
    }

    /// Appends a new candidate under the next free id. The caller has
    /// already checked the symbol is unique.
    pub(crate) fn insert(&mut self, name: String, symbol: Symbol) -> Result<&Candidate, Error> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or_else(|| {
            Error::limit_reached("No candidate IDs are left.", format!("next id {}", id))
        })?;

        let idx = self.candidates.len();
        self.by_symbol.insert(symbol, idx);
        self.candidates.push(Candidate::new(CandidateId(id), name, symbol));
        Ok(&self.candidates[idx])
    }

    /// Adds one vote for `symbol`. `Ok(None)` means no such candidate; a
    /// full counter is an error and leaves the tally as it was.
    pub(crate) fn record_vote(&mut self, symbol: Symbol) -> Result<Option<&Candidate>, Error> {
        let Some(&idx) = self.by_symbol.get(&symbol) else {
            return Ok(None);
        };
        let candidate = &mut self.candidates[idx];
        candidate.votes = candidate.votes.checked_add(1).ok_or_else(|| {
            Error::limit_reached("This candidate cannot take more votes.", format!("symbol {}", symbol))
        })?;
        Ok(Some(&*candidate))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn total_votes(&self) -> u64 {
        self.candidates.iter().map(|c| u64::from(c.votes)).sum()
    }
}
