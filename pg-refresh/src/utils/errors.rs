//! Error types for the refresh pipeline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    ExternalCommand {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Invalid backup timestamp in line {line:?}: {source}")]
    Parse {
        line: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("No backups available to select from")]
    EmptyResult,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, RefreshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_command_message_carries_stderr() {
        let err = RefreshError::ExternalCommand {
            command: "pg_restore --clean".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "relation \"users\" does not exist".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("pg_restore --clean"));
        assert!(msg.contains("relation \"users\" does not exist"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: RefreshError = io.into();
        assert!(matches!(err, RefreshError::Io(_)));
    }
}
