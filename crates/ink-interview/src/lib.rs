//! Interview session engine for Inkwell.
//!
//! Drives one [`ink_core::InterviewScript`] at a time: fuzzy command
//! recognition, the session state machine, versioned bundles, artifact
//! persistence, and the todo/alternative tracker used by editing scripts.

pub mod artifact;
pub mod bundle;
pub mod collaborator;
pub mod config;
pub mod error;
pub mod import;
pub mod reply;
pub mod session;
pub mod state;
pub mod tracker;

pub use artifact::ArtifactWriter;
pub use bundle::{Bundle, BundleHistory};
pub use collaborator::{Collaborator, OfflineCollaborator};
pub use config::EngineConfig;
pub use error::{InterviewError, InterviewResult};
pub use reply::{Reply, ReplyKind};
pub use session::InterviewSession;
pub use state::{Answer, Cursor, SessionState, SessionStatus};
