use serde::{Serialize, Deserialize};
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Clone, Copy, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    #[error("Symbol already in use")]
    DuplicateSymbol,
    #[error("Voter not found")]
    VoterNotFound,
    #[error("Candidate not found")]
    CandidateNotFound,
    #[error("Voter has already voted")]
    AlreadyVoted,
    #[error("No candidates registered")]
    EmptyCandidateList,
    #[error("Storage unavailable")]
    StorageUnavailable,
    #[error("Invalid input provided")]
    InvalidInput,
    #[error("Counter limit reached")]
    LimitReached,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(details) = &self.details {
            write!(f, "{}: {} ({})", self.code, self.message, details)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details.into()),
        }
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code
    }

    pub fn limit_reached(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::with_details(ErrorCode::LimitReached, message, details)
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::new(ErrorCode::InvalidInput, err.to_string())
    }
}

/// Failures while reading or writing one of the table files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unable to access {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
}

impl StoreError {
    pub fn unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Unavailable { path: path.into(), source }
    }

    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        StoreError::MalformedRow { line, reason: reason.into() }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::Unavailable { path, .. } => Error::with_details(
                ErrorCode::StorageUnavailable,
                format!("Unable to open {}", path.display()),
                err.to_string(),
            ),
            StoreError::MalformedRow { .. } => Error::with_details(
                ErrorCode::StorageUnavailable,
                "Stored table is malformed",
                err.to_string(),
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
