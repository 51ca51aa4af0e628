//! Coordinator-side entry point for plugin calls crossing host boundaries

use crate::broadcaster::Broadcaster;
use crate::forwarder::CallForwarder;
use crate::metrics::RoutingMetrics;
use remote_core::{
    ArgIndex, CallId, ConfigStorage, EndpointId, EndpointRegistry, LocalMethodCall, MethodCall,
    OwnershipTable, PluginId, PluginPackage, ProxyNameDefinition, Result, RouterConfig,
};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

/// Routes plugin lifecycle and method calls to the host that owns each plugin
pub struct PluginRemoteRouter {
    registry: Arc<EndpointRegistry>,
    ownership: Arc<OwnershipTable>,
    forwarder: CallForwarder,
    broadcaster: Broadcaster,
    metrics: RoutingMetrics,
}

impl PluginRemoteRouter {
    /// Create a router over an externally populated endpoint registry
    pub fn new(registry: Arc<EndpointRegistry>) -> Self {
        Self::with_metrics(registry, RoutingMetrics::default())
    }

    pub fn with_metrics(registry: Arc<EndpointRegistry>, metrics: RoutingMetrics) -> Self {
        let ownership = Arc::new(OwnershipTable::new());
        Self {
            forwarder: CallForwarder::new(registry.clone(), ownership.clone(), metrics.clone()),
            broadcaster: Broadcaster::new(registry.clone(), ownership.clone(), metrics.clone()),
            registry,
            ownership,
            metrics,
        }
    }

    /// Record that `endpoint` hosts `plugin_id`, replacing any previous owner
    pub async fn bind_plugin(&self, plugin_id: PluginId, endpoint: EndpointId) {
        self.ownership.bind(plugin_id, endpoint).await;
    }

    /// Apply the bindings of a routing configuration in order
    pub async fn apply_bindings(&self, config: &RouterConfig) {
        for binding in &config.bindings {
            self.bind_plugin(binding.plugin.clone(), binding.endpoint.clone())
                .await;
        }
        info!("Applied {} plugin bindings", config.bindings.len());
    }

    /// Load a plugin on its host; succeeds without doing anything if no host owns it
    pub async fn load_plugin(&self, plugin_id: &PluginId, storage: &ConfigStorage) -> Result<()> {
        self.forwarder.forward_load(plugin_id, storage).await
    }

    /// Activate a plugin on its host; succeeds without doing anything if no host owns it
    pub async fn activate_plugin(&self, plugin_id: &PluginId) -> Result<()> {
        self.forwarder.forward_activate(plugin_id).await
    }

    /// Call an exported entry of a plugin on behalf of `caller`
    pub async fn invoke_method(
        &self,
        caller: EndpointId,
        plugin_id: PluginId,
        call_id: CallId,
        entry_name: impl Into<String>,
        args: Vec<Value>,
    ) -> Result<Value> {
        self.forwarder
            .forward_invoke(MethodCall {
                caller,
                plugin_id,
                call_id,
                entry_name: entry_name.into(),
                args,
            })
            .await
    }

    /// Call back into a function argument that lives on `target`
    pub async fn invoke_local_method(
        &self,
        target: &EndpointId,
        call_id: CallId,
        arg_index: ArgIndex,
        args: Vec<Value>,
    ) -> Result<Value> {
        self.forwarder
            .forward_local_invoke(
                target,
                LocalMethodCall {
                    call_id,
                    arg_index,
                    args,
                },
            )
            .await
    }

    /// Publish a plugin's exports to every other host without waiting on delivery
    pub async fn publish_exports(
        &self,
        plugin_id: &PluginId,
        definitions: Vec<ProxyNameDefinition>,
    ) -> usize {
        self.broadcaster.broadcast_exports(plugin_id, definitions).await
    }

    /// Publish a plugin's package descriptor to every other host without waiting on delivery
    pub async fn publish_package(&self, plugin_id: &PluginId, package: PluginPackage) -> usize {
        self.broadcaster.broadcast_package(plugin_id, package).await
    }

    pub async fn owner_of(&self, plugin_id: &PluginId) -> Option<EndpointId> {
        self.ownership.owner_of(plugin_id).await
    }

    /// Registered endpoints other than the plugin's owner
    pub async fn others_of(&self, plugin_id: &PluginId) -> BTreeSet<EndpointId> {
        let endpoints = self.registry.all_ids().await;
        self.ownership.others_of(plugin_id, endpoints).await
    }

    pub fn registry(&self) -> &Arc<EndpointRegistry> {
        &self.registry
    }

    pub fn ownership(&self) -> &Arc<OwnershipTable> {
        &self.ownership
    }

    pub fn metrics(&self) -> &RoutingMetrics {
        &self.metrics
    }
}
