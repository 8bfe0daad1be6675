use crate::models::Symbol;

/// Longest name that still leaves one padding space inside the Name column.
pub const MAX_NAME_LENGTH: usize = 29;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name must not be empty")]
    EmptyName,
    #[error("Name exceeds maximum length of {MAX_NAME_LENGTH}")]
    NameTooLong,
    #[error("Name contains an invalid character: {0:?}")]
    InvalidNameCharacter(char),
    #[error("Invalid symbol: {0:?} (must be a single visible character)")]
    InvalidSymbol(String),
}

/// Trims the name and checks it fits a table row.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() { return Err(ValidationError::EmptyName); }
    if name.chars().count() > MAX_NAME_LENGTH { return Err(ValidationError::NameTooLong); }
    if let Some(c) = name.chars().find(|c| c.is_control()) {
        return Err(ValidationError::InvalidNameCharacter(c));
    }
    Ok(name.to_string())
}

pub fn validate_symbol(input: &str) -> Result<Symbol, ValidationError> {
    let mut chars = input.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Symbol::new(c).ok_or_else(|| ValidationError::InvalidSymbol(input.to_string())),
        _ => Err(ValidationError::InvalidSymbol(input.to_string())),
    }
}
