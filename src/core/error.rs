//! Error types for the logging facade

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No configuration document, or one that could not be parsed
    #[error("missing or invalid log configuration: {0}")]
    MissingConfiguration(String),

    /// A handler block named a kind outside {text, json, sentry}
    #[error("invalid log handler kind: '{kind}'")]
    InvalidHandlerKind { kind: String },

    /// Every configured handler failed to build
    #[error("no valid log handler")]
    NoValidHandler,

    /// A file-output block without a filename
    #[error("empty filename for handler '{handler}'")]
    EmptyFilename { handler: String },

    /// Writer could not be provisioned for a file output
    #[error("writer provisioning failed for '{path}': {message}")]
    WriterProvisioning { path: String, message: String },

    /// Remote transport construction or delivery failure
    #[error("transport error: {0}")]
    Transport(String),

    /// File rotation failure
    #[error("rotation failed for '{path}': {message}")]
    Rotation { path: String, message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn missing_configuration(message: impl Into<String>) -> Self {
        Error::MissingConfiguration(message.into())
    }

    pub fn invalid_handler_kind(kind: impl Into<String>) -> Self {
        Error::InvalidHandlerKind { kind: kind.into() }
    }

    pub fn empty_filename(handler: impl Into<String>) -> Self {
        Error::EmptyFilename {
            handler: handler.into(),
        }
    }

    pub fn writer_provisioning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::WriterProvisioning {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport(message.into())
    }

    pub fn rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Rotation {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::invalid_handler_kind("syslog");
        assert!(matches!(err, Error::InvalidHandlerKind { .. }));

        let err = Error::empty_filename("json");
        assert!(matches!(err, Error::EmptyFilename { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = Error::invalid_handler_kind("syslog");
        assert_eq!(err.to_string(), "invalid log handler kind: 'syslog'");

        let err = Error::NoValidHandler;
        assert_eq!(err.to_string(), "no valid log handler");

        let err = Error::writer_provisioning("/var/log/app.log", "permission denied");
        assert_eq!(
            err.to_string(),
            "writer provisioning failed for '/var/log/app.log': permission denied"
        );
    }
}
