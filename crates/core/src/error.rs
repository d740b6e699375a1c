/// Result alias that carries the custom [`PlayerUiError`] type.
pub type Result<T> = std::result::Result<T, PlayerUiError>;

/// Common error type for the core crate.
///
/// The marquee barrier never fails; these variants cover configuration
/// loading and the input-driven helpers.
#[derive(Debug, thiserror::Error)]
pub enum PlayerUiError {
    /// Free-form message for callers that only need something readable.
    #[error("{0}")]
    Message(String),
    /// Caller supplied a value the helper cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Configuration or item files that are not valid JSON.
    #[error("malformed json: {0}")]
    Config(#[from] serde_json::Error),
}

impl PlayerUiError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for PlayerUiError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for PlayerUiError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_render_verbatim() {
        let err: PlayerUiError = "queue is gone".into();
        assert_eq!(err.to_string(), "queue is gone");
    }

    #[test]
    fn json_errors_convert() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = PlayerUiError::from(parse);
        assert!(matches!(err, PlayerUiError::Config(_)));
        assert!(err.to_string().starts_with("malformed json"));
    }
}
