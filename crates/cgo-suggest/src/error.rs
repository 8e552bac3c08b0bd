/// Why a remote classification produced no result. None of these are
/// retried; callers fall back to the keyword classifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    #[error("invalid input: {0}")]
    InputValidation(String),
    #[error("classifier not configured: {0}")]
    Configuration(String),
    #[error("classifier request failed: {0}")]
    Transport(String),
    #[error("no JSON object in classifier reply")]
    Parse,
    #[error("classifier reply has the wrong shape: {0}")]
    Structure(String),
}

impl ClassifyError {
    /// Stable snake_case name used on the wire and in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifyError::InputValidation(_) => "input_validation",
            ClassifyError::Configuration(_) => "configuration",
            ClassifyError::Transport(_) => "transport",
            ClassifyError::Parse => "parse",
            ClassifyError::Structure(_) => "structure",
        }
    }
}
