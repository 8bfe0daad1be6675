use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

pub const CANDIDATE_FILE: &str = "candidates.txt";
pub const VOTER_FILE: &str = "voters.txt";

/// Where the two tables live on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    pub candidate_file: PathBuf,
    pub voter_file: PathBuf,
}

impl StorageConfig {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            candidate_file: dir.join(CANDIDATE_FILE),
            voter_file: dir.join(VOTER_FILE),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            candidate_file: PathBuf::from(CANDIDATE_FILE),
            voter_file: PathBuf::from(VOTER_FILE),
        }
    }
}
