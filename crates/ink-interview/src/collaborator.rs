//! The seam to whatever answers `suggest` and `analyze` requests.

/// An opaque helper the session delegates open-ended requests to.
///
/// Implementations may call out to a language model, a human or a stub.
/// Errors are returned as plain messages and never end the session.
pub trait Collaborator {
    /// Suggest an answer to `question`, given the transcript so far.
    fn answer(&mut self, question: &str, transcript: &str) -> Result<String, String>;

    /// Comment on the transcript so far.
    fn analyze(&mut self, transcript: &str) -> Result<String, String>;
}

/// Collaborator used when nothing is configured. Declines every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCollaborator;

impl Collaborator for OfflineCollaborator {
    fn answer(&mut self, _question: &str, _transcript: &str) -> Result<String, String> {
        Ok("No collaborator is connected. Answer in your own words.".to_string())
    }

    fn analyze(&mut self, _transcript: &str) -> Result<String, String> {
        Ok("No collaborator is connected, so there is no analysis yet.".to_string())
    }
}
