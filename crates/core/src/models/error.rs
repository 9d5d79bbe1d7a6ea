use crate::prelude::*;

use std::time::Duration;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that abort a test-plan run.
///
/// Per-iteration RPC failures never surface here, they are recorded as failed
/// [`Sample`]s instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Identity error {0}")]
    Identity(#[from] IdentityError),

    #[error("Invocation build error {0}")]
    InvocationBuild(#[from] InvocationBuildError),

    #[error("Failed to open setup connection: {0}")]
    SetupConnection(RpcError),

    #[error("Sample sink error {0}")]
    Sink(#[from] SinkError),

    #[error("Join virtual user error {0}")]
    JoinVirtualUser(#[from] Box<tokio::task::JoinError>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Parameter `{name}` has invalid value `{value}`, expected {expected}: {underlying}")]
    InvalidValue {
        name: String,
        value: String,
        expected: &'static str,
        underlying: String,
    },

    #[error("Parameter `{name}` must be set")]
    MissingValue { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("No identity found for `{name}`")]
    NotFound { name: String },

    #[error("Name `{name}` is ambiguous, {matches} identities match")]
    Ambiguous { name: String, matches: usize },

    #[error("The network map reports no notary")]
    NoNotaryAvailable,

    #[error("Failed to look up `{name}`: {underlying}")]
    Lookup { name: String, underlying: RpcError },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvocationBuildError {
    #[error("Operation `{operation}` takes {expected} arguments, got {actual}")]
    ArityMismatch {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Operation `{operation}` expects {expected} at position {position}, got {actual}")]
    TypeMismatch {
        operation: &'static str,
        position: usize,
        expected: ArgKind,
        actual: ArgKind,
    },
}

/// Failure of a single remote call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    #[error("Timed out after {} ms", .after.as_millis())]
    Timeout { after: Duration },

    #[error("Remote call failed: {message}")]
    Remote { message: String },

    #[error("Connection lost: {underlying}")]
    ConnectionLost { underlying: String },

    #[error("Failed to decode response: {underlying}")]
    Decode { underlying: String },

    #[error("Failed to connect to {url} after {attempts} attempts: {underlying}")]
    Connect {
        url: String,
        attempts: usize,
        underlying: String,
    },
}

impl RpcError {
    pub fn kind(&self) -> SampleErrorKind {
        match self {
            RpcError::Timeout { .. } => SampleErrorKind::Timeout,
            RpcError::Remote { .. } => SampleErrorKind::Remote,
            RpcError::Decode { .. } => SampleErrorKind::Decode,
            RpcError::ConnectionLost { .. } | RpcError::Connect { .. } => {
                SampleErrorKind::ConnectionLost
            }
        }
    }

    pub fn is_connection_loss(&self) -> bool {
        self.kind() == SampleErrorKind::ConnectionLost
    }
}

/// Raised by a response post-processing hook. Logged, never fails the sample.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Failed to write sample: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize sample: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_error_kinds() {
        assert_eq!(
            RpcError::Timeout {
                after: Duration::from_millis(5)
            }
            .kind(),
            SampleErrorKind::Timeout
        );
        assert!(RpcError::ConnectionLost {
            underlying: "reset".to_owned()
        }
        .is_connection_loss());
        assert!(!RpcError::Remote {
            message: "flow failed".to_owned()
        }
        .is_connection_loss());
    }

    #[test]
    fn timeout_display_in_millis() {
        let error = RpcError::Timeout {
            after: Duration::from_secs(2),
        };
        assert_eq!(error.to_string(), "Timed out after 2000 ms");
    }
}
