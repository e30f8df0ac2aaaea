use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SgdError>;

/// Which side of the class partition is missing from a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelClass {
    Positive,
    Negative,
}

impl std::fmt::Display for LabelClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelClass::Positive => write!(f, "positive"),
            LabelClass::Negative => write!(f, "negative"),
        }
    }
}

/// Errors raised at dataset construction and training entry.
///
/// Everything is checked before the training loop starts, so none of these
/// can surface mid-run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SgdError {
    #[error("Invalid sparse vector at row {position}: {reason}")]
    InvalidVector { position: usize, reason: String },

    #[error("Invalid training configuration: {0}")]
    InvalidConfig(String),

    #[error("Dataset contains no vectors")]
    EmptyDataset,

    #[error("Balanced sampling requires both classes, but the dataset has no {missing} examples")]
    DegenerateDataset { missing: LabelClass },
}

impl SgdError {
    pub(crate) fn invalid_vector(position: usize, reason: impl Into<String>) -> Self {
        SgdError::InvalidVector {
            position,
            reason: reason.into(),
        }
    }
}
