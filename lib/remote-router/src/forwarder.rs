//! Forwarding of plugin calls to the single endpoint that hosts the plugin
//!
//! Calls for a plugin with no owner follow one of two policies: lifecycle
//! calls are skipped ([`CallForwarder::forward_load`],
//! [`CallForwarder::forward_activate`]) while method calls are rejected with
//! [`CoreError::UnknownPlugin`]. A plugin bound to an endpoint that is not
//! registered is an error under both.

use crate::metrics::{Operation, Outcome, RoutingMetrics};
use remote_core::{
    ConfigStorage, CoreError, EndpointId, EndpointRegistry, LocalMethodCall, MethodCall,
    OwnershipTable, PluginId, RemoteError, RemoteHandle, Result,
};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Forwards calls to one endpoint and waits for the answer
pub struct CallForwarder {
    registry: Arc<EndpointRegistry>,
    ownership: Arc<OwnershipTable>,
    metrics: RoutingMetrics,
}

impl CallForwarder {
    pub fn new(
        registry: Arc<EndpointRegistry>,
        ownership: Arc<OwnershipTable>,
        metrics: RoutingMetrics,
    ) -> Self {
        Self {
            registry,
            ownership,
            metrics,
        }
    }

    /// Load a plugin on its owner. No-op when the plugin is unbound.
    pub async fn forward_load(&self, plugin_id: &PluginId, storage: &ConfigStorage) -> Result<()> {
        let Some((endpoint, remote)) = self
            .owner_or_skip(plugin_id, Operation::LoadPlugin)
            .await?
        else {
            return Ok(());
        };

        self.timed(Operation::LoadPlugin, &endpoint, remote.load_plugin(plugin_id, storage))
            .await
    }

    /// Activate a plugin on its owner. No-op when the plugin is unbound.
    pub async fn forward_activate(&self, plugin_id: &PluginId) -> Result<()> {
        let Some((endpoint, remote)) = self
            .owner_or_skip(plugin_id, Operation::ActivatePlugin)
            .await?
        else {
            return Ok(());
        };

        self.timed(Operation::ActivatePlugin, &endpoint, remote.activate_plugin(plugin_id))
            .await
    }

    /// Run an exported method on the plugin's owner and return its result.
    ///
    /// Fails with [`CoreError::UnknownPlugin`] when the plugin is unbound.
    pub async fn forward_invoke(&self, call: MethodCall) -> Result<Value> {
        let (endpoint, remote) = self
            .owner_or_fail(&call.plugin_id, Operation::InvokeMethod)
            .await?;

        debug!(
            "Invoking {}#{} (call {}) from {} on {}",
            call.plugin_id, call.entry_name, call.call_id, call.caller, endpoint
        );
        let MethodCall {
            caller,
            plugin_id,
            call_id,
            entry_name,
            args,
        } = call;
        self.timed(
            Operation::InvokeMethod,
            &endpoint,
            remote.invoke_method(&caller, &plugin_id, call_id, &entry_name, args),
        )
        .await
    }

    /// Run a callback on a known endpoint, bypassing plugin ownership
    pub async fn forward_local_invoke(
        &self,
        target: &EndpointId,
        call: LocalMethodCall,
    ) -> Result<Value> {
        let remote = match self.registry.require(target).await {
            Ok(remote) => remote,
            Err(err) => {
                warn!("Local call {} targets unregistered endpoint {}", call.call_id, target);
                self.metrics.record_unreachable(Operation::InvokeLocalMethod);
                return Err(err);
            }
        };

        debug!("Invoking local callback {}[{}] on {}", call.call_id, call.arg_index, target);
        self.timed(
            Operation::InvokeLocalMethod,
            target,
            remote.invoke_local_method(call.call_id, call.arg_index, call.args),
        )
        .await
    }

    /// Owner of a plugin, or `None` when unbound so the call can be skipped
    async fn owner_or_skip(
        &self,
        plugin_id: &PluginId,
        operation: Operation,
    ) -> Result<Option<(EndpointId, RemoteHandle)>> {
        let owner = self.lookup_owner(plugin_id, operation).await?;
        if owner.is_none() {
            debug!("No host for plugin {}, skipping {}", plugin_id, operation.as_str());
        }
        Ok(owner)
    }

    /// Owner of a plugin, failing when unbound
    async fn owner_or_fail(
        &self,
        plugin_id: &PluginId,
        operation: Operation,
    ) -> Result<(EndpointId, RemoteHandle)> {
        self.lookup_owner(plugin_id, operation).await?.ok_or_else(|| {
            warn!("No host for plugin {}, rejecting {}", plugin_id, operation.as_str());
            CoreError::UnknownPlugin(plugin_id.clone())
        })
    }

    /// Find the owner of a plugin and its remote.
    ///
    /// `Ok(None)` means the plugin is unbound. A bound plugin whose endpoint
    /// is gone is always an error.
    async fn lookup_owner(
        &self,
        plugin_id: &PluginId,
        operation: Operation,
    ) -> Result<Option<(EndpointId, RemoteHandle)>> {
        let Some(endpoint) = self.ownership.owner_of(plugin_id).await else {
            self.metrics.record_unrouted(operation);
            return Ok(None);
        };

        match self.registry.resolve(&endpoint).await {
            Some(remote) => Ok(Some((endpoint, remote))),
            None => {
                warn!(
                    "Plugin {} is bound to unregistered endpoint {}",
                    plugin_id, endpoint
                );
                self.metrics.record_unreachable(operation);
                Err(CoreError::EndpointNotFound(endpoint))
            }
        }
    }

    /// Await a remote call, recording its latency and outcome
    async fn timed<T, F>(&self, operation: Operation, endpoint: &EndpointId, call: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, RemoteError>>,
    {
        let started = Instant::now();
        let result = call.await;
        let elapsed = started.elapsed();

        match result {
            Ok(value) => {
                self.metrics.record_forward(operation, Outcome::Ok, elapsed);
                Ok(value)
            }
            Err(source) => {
                warn!("{} on {} failed: {}", operation.as_str(), endpoint, source);
                self.metrics
                    .record_forward(operation, Outcome::RemoteError, elapsed);
                Err(CoreError::Remote {
                    endpoint: endpoint.clone(),
                    source,
                })
            }
        }
    }
}
