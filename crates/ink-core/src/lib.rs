//! Core types for Inkwell: interview scripts, the script registry, and
//! command matching.
//!
//! An [`InterviewScript`] is pure data: ordered categories of questions, a
//! command vocabulary, and output path templates. Every interview (character,
//! dialogue, location, editing, ...) is one script record driven by the same
//! engine in `ink-interview`.

/// Built-in script definitions embedded at compile time.
pub mod builtin;
/// Canonical commands and per-script command tables.
pub mod command;
/// Error types used throughout the crate.
pub mod error;
/// Fuzzy matching of user utterances to canonical commands.
pub mod matcher;
/// Output path templates and placeholder substitution.
pub mod paths;
/// Lookup table of loaded scripts.
pub mod registry;
/// The interview script data model.
pub mod script;

pub use command::{CommandKind, CommandSpec, CommandTable};
pub use error::{CoreError, CoreResult};
pub use matcher::{Candidate, CommandMatcher, MatchResult, MatcherConfig};
pub use paths::{PathTemplates, TemplateVars};
pub use registry::ScriptRegistry;
pub use script::{Category, InterviewScript, Question};
