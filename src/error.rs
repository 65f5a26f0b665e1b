/// Main error type for conversions and driver resolution
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TtsError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Text source error: {0}")]
    Source(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl TtsError {
    /// Short, stable name of the error kind for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Provider(_) => "provider",
            Self::Source(_) => "source",
            Self::Storage(_) => "storage",
        }
    }

    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}

/// Custom result type for the crate
pub type TtsResult<T> = Result<T, TtsError>;
