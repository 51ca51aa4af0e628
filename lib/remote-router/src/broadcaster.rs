//! Fan-out of plugin metadata to every endpoint except the plugin's owner
//!
//! Deliveries are spawned and never joined. The caller gets control back as
//! soon as every delivery is dispatched; failures are logged and counted but
//! never reported back.

use crate::metrics::{Operation, Outcome, RoutingMetrics};
use remote_core::{
    EndpointId, EndpointRegistry, OwnershipTable, PluginId, PluginPackage, ProxyNameDefinition,
    RemoteHandle, RemoteResult,
};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct Broadcaster {
    registry: Arc<EndpointRegistry>,
    ownership: Arc<OwnershipTable>,
    metrics: RoutingMetrics,
}

impl Broadcaster {
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

    /// Tell every non-owning endpoint what the plugin exports.
    ///
    /// Each target receives its own id as the first argument. Returns the
    /// number of deliveries dispatched.
    pub async fn broadcast_exports(
        &self,
        plugin_id: &PluginId,
        definitions: Vec<ProxyNameDefinition>,
    ) -> usize {
        let definitions: Arc<[ProxyNameDefinition]> = definitions.into();
        let plugin_id = plugin_id.clone();

        self.fan_out(&plugin_id, Operation::DefineExports, |target, remote| {
            let plugin_id = plugin_id.clone();
            let definitions = definitions.clone();
            async move { remote.define_exports(&target, &plugin_id, &definitions).await }
        })
        .await
    }

    /// Tell every non-owning endpoint the plugin's package descriptor.
    /// Returns the number of deliveries dispatched.
    pub async fn broadcast_package(&self, plugin_id: &PluginId, package: PluginPackage) -> usize {
        let package = Arc::new(package);
        let plugin_id = plugin_id.clone();

        self.fan_out(&plugin_id, Operation::DefinePackage, |_, remote| {
            let plugin_id = plugin_id.clone();
            let package = package.clone();
            async move { remote.define_package(&plugin_id, &package).await }
        })
        .await
    }

    /// Spawn one delivery per target without waiting on any of them
    async fn fan_out<F, Fut>(&self, plugin_id: &PluginId, operation: Operation, deliver: F) -> usize
    where
        F: Fn(EndpointId, RemoteHandle) -> Fut,
        Fut: Future<Output = RemoteResult<()>> + Send + 'static,
    {
        let endpoints = self.registry.all_ids().await;
        let targets = self.ownership.others_of(plugin_id, endpoints).await;
        if targets.is_empty() {
            debug!("No broadcast targets for plugin {} ({})", plugin_id, operation.as_str());
            return 0;
        }

        let mut dispatched = 0;
        for target in targets {
            // The endpoint may have been deregistered since all_ids()
            let Some(remote) = self.registry.resolve(&target).await else {
                warn!(
                    "Skipping {} for {}: endpoint {} is gone",
                    operation.as_str(),
                    plugin_id,
                    target
                );
                self.metrics.record_delivery(operation, Outcome::EndpointMissing);
                continue;
            };

            let delivery = deliver(target.clone(), remote);
            let metrics = self.metrics.clone();
            let plugin_id = plugin_id.clone();
            tokio::spawn(async move {
                match delivery.await {
                    Ok(()) => {
                        debug!("Delivered {} for {} to {}", operation.as_str(), plugin_id, target);
                        metrics.record_delivery(operation, Outcome::Ok);
                    }
                    Err(e) => {
                        warn!(
                            "Delivery of {} for {} to {} failed: {}",
                            operation.as_str(),
                            plugin_id,
                            target,
                            e
                        );
                        metrics.record_delivery(operation, Outcome::RemoteError);
                    }
                }
            });
            dispatched += 1;
        }

        debug!(
            "Dispatched {} for {} to {} endpoints",
            operation.as_str(),
            plugin_id,
            dispatched
        );
        dispatched
    }
}
