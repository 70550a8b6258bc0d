//! Error types shared by the scoring core and the dataset adapter

use thiserror::Error;

/// Errors that can occur while loading, scoring or summarizing passengers
#[derive(Error, Debug)]
pub enum VoyageError {
    #[error("Malformed record {record}: {reason}")]
    MalformedInput { record: String, reason: String },

    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VoyageError {
    pub fn malformed(record: impl Into<String>, reason: impl Into<String>) -> Self {
        VoyageError::MalformedInput {
            record: record.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        VoyageError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type VoyageResult<T> = Result<T, VoyageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = VoyageError::malformed("line 3", "missing Sex");
        assert_eq!(err.to_string(), "Malformed record line 3: missing Sex");

        let err = VoyageError::invalid("contamination", "must be in (0, 100], got 0");
        assert!(err.to_string().contains("`contamination`"));
    }
}
