use thiserror::Error;

use super::travel_time_matrix::MatrixError;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("At least 3 events are required (start, one hosted round, end), got {0}")]
    TooFewEvents(usize),

    #[error("Group name \"{0}\" is used more than once")]
    DuplicateGroupName(String),

    #[error("Group \"{name}\" has non-finite coordinates")]
    NonFiniteLocation { name: String },

    #[error("Group \"{name}\" hosts event {round}, but only events 1 to {last_round} are hosted")]
    HostRoundOutOfRange {
        name: String,
        round: usize,
        last_round: usize,
    },

    #[error("No group hosts round {round} (\"{label}\")")]
    MissingHost { round: usize, label: String },

    #[error("No travel times were provided")]
    MissingTravelTimes,

    #[error("Travel times cover {found} locations, expected {expected}")]
    MatrixSizeMismatch { expected: usize, found: usize },

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error("Penalty weight \"{name}\" must be finite and non-negative, got {value}")]
    InvalidPenalty { name: &'static str, value: f64 },
}
