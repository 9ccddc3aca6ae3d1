use std::fmt;

use thiserror::Error;

/// Kind of record a lookup failed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Session,
    Item,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Session => f.write_str("session"),
            Entity::Item => f.write_str("item"),
        }
    }
}

/// Whether retrying the failed operation may succeed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Transience {
    /// Retry will never help without changing inputs or state.
    Permanent,
    /// Retry may help (backend outage).
    Retryable,
}

impl Transience {
    pub fn is_retryable(self) -> bool {
        matches!(self, Transience::Retryable)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("cannot start a ranking session with no items")]
    EmptyInput,

    #[error("item {0} was submitted more than once")]
    DuplicateItem(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: String },

    #[error("invalid choice: {0}")]
    InvalidChoice(String),

    #[error("ranking is not complete yet")]
    NotComplete,

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl Error {
    pub fn session_not_found(id: impl Into<String>) -> Self {
        Error::NotFound {
            entity: Entity::Session,
            id: id.into(),
        }
    }

    pub fn item_not_found(id: impl Into<String>) -> Self {
        Error::NotFound {
            entity: Entity::Item,
            id: id.into(),
        }
    }

    pub fn transience(&self) -> Transience {
        match self {
            Error::StoreUnavailable(_) => Transience::Retryable,
            _ => Transience::Permanent,
        }
    }

    /// Caused by the request rather than the backend (4xx rather than 5xx).
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Error::StoreUnavailable(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_store_failures_are_retryable() {
        assert!(Error::StoreUnavailable("disk full".into()).transience().is_retryable());
        assert!(!Error::EmptyInput.transience().is_retryable());
        assert!(!Error::session_not_found("s1").transience().is_retryable());
        assert!(!Error::InvalidChoice("C".into()).transience().is_retryable());
    }

    #[test]
    fn test_user_errors() {
        assert!(Error::EmptyInput.is_user_error());
        assert!(Error::NotComplete.is_user_error());
        assert!(!Error::StoreUnavailable("timeout".into()).is_user_error());
    }

    #[test]
    fn test_not_found_display_names_entity() {
        assert_eq!(Error::session_not_found("ses1").to_string(), "session not found: ses1");
        assert_eq!(Error::item_not_found("rec9").to_string(), "item not found: rec9");
    }
}
