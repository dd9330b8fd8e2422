//! Error types for the interview engine.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for interview operations.
pub type InterviewResult<T> = Result<T, InterviewError>;

/// Errors that can occur while running an interview session.
#[derive(Debug, Error)]
pub enum InterviewError {
    /// Script registry or script definition error.
    #[error("{0}")]
    Core(#[from] ink_core::CoreError),

    /// Input had to be a command but nothing matched.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// No todo has this id.
    #[error("unknown todo: {0}")]
    UnknownTodo(String),

    /// The todo is already done.
    #[error("todo {0} is already resolved")]
    AlreadyResolved(String),

    /// Writing an artifact failed.
    #[error("cannot write {path}: {source}")]
    Persistence {
        /// The file or directory being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Imported notes could not be associated with any question.
    #[error("could not match imported notes to any question: {0}")]
    ImportParse(String),

    /// A chapter has fewer than two drafts to compare.
    #[error("chapter {chapter} has {found} draft(s); compare needs two")]
    NotEnoughDrafts {
        /// The chapter id.
        chapter: String,
        /// How many drafts were found.
        found: usize,
    },

    /// Malformed input for the current state or command.
    #[error("{0}")]
    InvalidInput(String),

    /// The collaborator failed to answer.
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// The session has ended and accepts no more input.
    #[error("the session has ended")]
    SessionEnded,

    /// The engine configuration file is malformed.
    #[error("invalid config {path}: {message}")]
    Config {
        /// The config file path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

impl InterviewError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }
}
