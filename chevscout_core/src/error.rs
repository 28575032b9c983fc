use thiserror::Error;

/// Everything that can go wrong between form submit and rendered report.
/// All four variants surface to the user as the same error panel; only the
/// message text differs.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// Missing or unusable credential at startup. The only unrecoverable
    /// variant: the form is replaced entirely, no retry affordance.
    #[error("{0}")]
    Configuration(String),

    /// Caught before any file read or network call.
    #[error("{0}")]
    Validation(String),

    /// The model call itself failed. Carries the backend's message verbatim.
    #[error("Model service error: {0}")]
    Service(String),

    /// The response text did not parse as the expected structure.
    #[error("Could not read the model response: {0}")]
    Parse(String),
}

impl AdvisorError {
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AdvisorError::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_configuration_is_unrecoverable() {
        assert!(!AdvisorError::Configuration("no key".into()).is_recoverable());
        assert!(AdvisorError::Validation("Invalid file type".into()).is_recoverable());
        assert!(AdvisorError::Service("503".into()).is_recoverable());
        assert!(AdvisorError::Parse("eof".into()).is_recoverable());
    }
}
