use std::path::PathBuf;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while loading or validating interview scripts.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No script definition exists for the requested id.
    #[error("unknown script: \"{0}\"")]
    UnknownScript(String),

    /// A script parsed but breaks a structural rule.
    #[error("invalid script \"{script}\": {reason}")]
    InvalidScript {
        /// The offending script id (or file name when the id is missing).
        script: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A script file is not valid TOML for the script schema.
    #[error("cannot parse script {origin}: {message}")]
    ScriptParse {
        /// Where the text came from (file path or `builtin:<id>`).
        origin: String,
        /// Parser message.
        message: String,
    },

    /// A path template references a placeholder that has no value.
    #[error("template \"{template}\" needs a value for {{{placeholder}}}")]
    MissingPlaceholder {
        /// The template being rendered.
        template: String,
        /// The placeholder name without braces.
        placeholder: String,
    },

    /// Reading a script directory or file failed.
    #[error("cannot read {path}: {source}")]
    Io {
        /// The path being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
