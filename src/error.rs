use thiserror::Error;

use crate::models::{CourseId, WeekId};

/// Every way a gateway call can fail. The navigator treats all of them the same:
/// the affected level is left empty and a message is recorded for it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Catalog API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No session credential available")]
    MissingCredential,

    #[error("Unavailable: {0}")]
    Unavailable(String),
}

/// Selections the caller must never produce.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("No course is selected")]
    NoCourseSelected,

    #[error("Week {week_id} belongs to course {owner}, not the selected course {selected}")]
    ForeignWeek {
        week_id: WeekId,
        owner: CourseId,
        selected: CourseId,
    },

    #[error("No item at position {0}")]
    NoSuchItem(usize),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog fixture: {0}")]
    Fixture(#[from] serde_json::Error),
}
