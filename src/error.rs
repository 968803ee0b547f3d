use thiserror::Error;

/// Unified error type for mdqp operations
#[derive(Error, Debug)]
pub enum MdqpError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Queue error: {0}")]
    Queue(#[from] rusqlite::Error),

    #[error("Queue payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("MDQ request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("MDQ error: {0}")]
    Mdq(String),

    #[error("Image naming error: {0}")]
    Image(String),

    #[error("Command failed: {0}")]
    Command(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in mdqp
pub type Result<T> = std::result::Result<T, MdqpError>;

impl MdqpError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        MdqpError::Config(msg.into())
    }

    /// Create a metadata error with context
    pub fn metadata(msg: impl Into<String>) -> Self {
        MdqpError::Metadata(msg.into())
    }

    /// Create an MDQ protocol error with context
    pub fn mdq(msg: impl Into<String>) -> Self {
        MdqpError::Mdq(msg.into())
    }

    /// Create an image naming error with context
    pub fn image(msg: impl Into<String>) -> Self {
        MdqpError::Image(msg.into())
    }

    /// Create a command execution error with context
    pub fn command(msg: impl Into<String>) -> Self {
        MdqpError::Command(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MdqpError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MdqpError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_constructors() {
        assert!(MdqpError::metadata("test")
            .to_string()
            .contains("Metadata"));
        assert!(MdqpError::mdq("test").to_string().contains("MDQ"));
        assert!(MdqpError::image("test").to_string().contains("Image"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (MdqpError::config("x"), "Configuration error"),
            (MdqpError::metadata("x"), "Metadata error"),
            (MdqpError::mdq("x"), "MDQ error"),
            (MdqpError::image("x"), "Image naming error"),
            (MdqpError::command("x"), "Command failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
