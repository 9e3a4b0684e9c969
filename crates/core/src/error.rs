use crate::timeline::CallbackId;

/// Result alias that carries the custom [`TunnelError`] type.
pub type Result<T> = std::result::Result<T, TunnelError>;

/// Common error type for the core crate.
///
/// Saturated packing areas and zero-length camera moves are normal outcomes
/// and never surface through this type.
#[derive(Debug, thiserror::Error)]
pub enum TunnelError {
    /// A cue was fired before the binding it refers to exists.
    #[error("cue binding {0} is not registered")]
    ResourceNotReady(usize),
    /// A sequence was registered against a callback that has no handler.
    #[error("no handler bound for callback {0:?}")]
    UnknownCallback(CallbackId),
    /// Configuration values that cannot drive a simulation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl TunnelError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub(crate) fn config<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<&str> for TunnelError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for TunnelError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
