use crate::{EndpointId, PluginId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("No matching host for the plugin with id {0}")]
    UnknownPlugin(PluginId),

    #[error("Endpoint not found: {0}")]
    EndpointNotFound(EndpointId),

    #[error("Remote call to endpoint {endpoint} failed: {source}")]
    Remote {
        endpoint: EndpointId,
        #[source]
        source: RemoteError,
    },

    #[error("Invalid routing configuration: {0}")]
    InvalidConfiguration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Failure reported by a plugin host's remote call interface
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    /// The host ran the call and raised an error
    #[error("call rejected: {0}")]
    Rejected(String),

    #[error("transport disconnected: {0}")]
    Disconnected(String),

    #[error("call timed out")]
    Timeout,
}
