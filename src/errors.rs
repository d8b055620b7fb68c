/*!
 * Error types for the cuesync engine.
 *
 * This module contains custom error types for the different layers of the engine,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised by timeline construction, edits and synchronization
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// A stretch was requested against a duration that cannot be divided by
    #[error("Invalid duration for synchronization: current {current}s, target {target}s")]
    InvalidDuration {
        /// Duration the captions are currently timed against
        current: f64,
        /// Duration the captions should be stretched to
        target: f64,
    },

    /// An entry would violate `0 <= start < end`
    #[error("Invalid subtitle entry: {0}")]
    InvalidEntry(String),

    /// An edit addressed an entry that does not exist
    #[error("Entry index {index} out of range for timeline of {len} entries")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of entries in the timeline
        len: usize,
    },

    /// Strict timecode parsing failed
    #[error("Invalid timecode: {0:?}")]
    InvalidTimecode(String),
}

/// Errors reported by external collaborators (transcription, speech synthesis, burn-in)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    /// The collaborator could not be reached or the request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The collaborator answered with something the engine cannot use
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The transcoding tool exited unsuccessfully
    #[error("Transcoding failed: {0}")]
    TranscodeFailed(String),

    /// No answer within the configured timeout
    #[error("Request timed out after {0}s")]
    TimedOut(u64),
}

/// Errors raised by the editing session
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// A response arrived for a request that has since been superseded
    #[error("Stale response: request generation {received}, session is at {current}")]
    StaleResponse {
        /// Generation carried by the response
        received: u64,
        /// Generation of the session when the response was applied
        current: u64,
    },

    /// The session has no footage to synchronize against
    #[error("No footage loaded")]
    NoFootage,

    /// Error from a timeline operation
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// Error from a collaborator call
    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),
}

/// Main error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the configuration layer
    #[error("Config error: {0}")]
    Config(String),

    /// Error from a timeline operation
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// Error from the editing session
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}
