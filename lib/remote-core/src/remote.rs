//! Remote call interface exposed by every plugin host endpoint

use crate::error::RemoteError;
use crate::{
    ArgIndex, CallId, ConfigStorage, EndpointId, PluginId, PluginPackage, ProxyNameDefinition,
};
use async_trait::async_trait;
use serde_json::Value;

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Calls the coordinator can issue against a single plugin host.
///
/// Implementations own the transport (and any timeout it imposes). The
/// router only decides which host receives which call.
#[async_trait]
pub trait PluginHostRemote: Send + Sync {
    /// Load `plugin_id` on this host
    async fn load_plugin(&self, plugin_id: &PluginId, storage: &ConfigStorage) -> RemoteResult<()>;

    /// Activate a previously loaded plugin
    async fn activate_plugin(&self, plugin_id: &PluginId) -> RemoteResult<()>;

    /// Run an exported entry of a plugin hosted here on behalf of `caller`
    async fn invoke_method(
        &self,
        caller: &EndpointId,
        plugin_id: &PluginId,
        call_id: CallId,
        entry_name: &str,
        args: Vec<Value>,
    ) -> RemoteResult<Value>;

    /// Run a callback argument that lives on this host
    async fn invoke_local_method(
        &self,
        call_id: CallId,
        arg_index: ArgIndex,
        args: Vec<Value>,
    ) -> RemoteResult<Value>;

    /// Learn the exports of a plugin hosted elsewhere.
    /// `target` is this host's own id.
    async fn define_exports(
        &self,
        target: &EndpointId,
        plugin_id: &PluginId,
        definitions: &[ProxyNameDefinition],
    ) -> RemoteResult<()>;

    /// Learn the package descriptor of a plugin hosted elsewhere
    async fn define_package(
        &self,
        plugin_id: &PluginId,
        package: &PluginPackage,
    ) -> RemoteResult<()>;
}
