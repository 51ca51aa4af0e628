//! Endpoint and plugin identifiers plus the payloads carried between hosts
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of a call issued by a plugin host, echoed back with the result
pub type CallId = u64;

/// Position of a callback argument in a local method call
pub type ArgIndex = u32;

/// Opaque label of a plugin host endpoint (e.g. the host's process name)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointId(String);

impl EndpointId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EndpointId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EndpointId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Stable identifier of a plugin, e.g. `publisher.name`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginId(String);

impl PluginId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PluginId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PluginId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Storage locations handed to a plugin host when it loads a plugin
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigStorage {
    pub host_log_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_storage_path: Option<String>,
    pub host_global_storage_path: String,
}

/// Declaration of a proxy object a plugin exports to other hosts.
/// The router never looks inside it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProxyNameDefinition(pub Value);

/// Package descriptor of a plugin, forwarded as-is
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginPackage(pub Value);

/// Invocation of a method exported by a plugin hosted elsewhere
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodCall {
    /// Host that issued the call
    pub caller: EndpointId,
    pub plugin_id: PluginId,
    pub call_id: CallId,
    /// Name of the exported entry to run
    pub entry_name: String,
    pub args: Vec<Value>,
}

/// Invocation of a callback living on a known host.
/// The plugin is implied by the destination endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalMethodCall {
    pub call_id: CallId,
    pub arg_index: ArgIndex,
    pub args: Vec<Value>,
}
