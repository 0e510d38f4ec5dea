use thiserror::Error;

// Rejected before anything reaches the store
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field `{field}` must be a number, got `{value}`")]
    NotNumeric { field: &'static str, value: String },

    #[error("field `{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: String },

    #[error("field `{field}` is out of range (at most {max}), got {value}")]
    TooLarge {
        field: &'static str,
        max: String,
        value: String,
    },

    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid task id `{0}`")]
    InvalidId(String),

    #[error("entry {index}: {source}")]
    InEntry {
        index: usize,
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    pub fn at(self, index: usize) -> Self {
        ValidationError::InEntry {
            index,
            source: Box::new(self),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("task {id} has an unreadable time_billed value {value}")]
    InvalidRow { id: i64, value: String },

    #[error("task store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {name} has invalid value `{value}`: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}
