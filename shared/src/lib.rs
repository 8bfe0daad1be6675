pub mod error;
pub mod models;
pub mod validation;
pub mod config;
pub mod table;
pub mod candidate_store;
pub mod voter_store;
pub mod election;

pub use error::{Error, ErrorCode, Result, StoreError};
pub use models::*;
pub use validation::*;
pub use config::StorageConfig;
pub use candidate_store::CandidateStore;
pub use voter_store::VoterStore;
pub use election::ElectionService;
