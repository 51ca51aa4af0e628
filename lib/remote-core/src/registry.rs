//! Endpoint registry mapping host ids to their remote call interfaces

use crate::{CoreError, EndpointId, PluginHostRemote, Result};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Shared handle to a host's remote call interface
pub type RemoteHandle = Arc<dyn PluginHostRemote>;

/// EndpointRegistry holds every live plugin host endpoint.
///
/// Remotes are created by whoever populates the registry; the registry only
/// stores the association and hands out clones of the handle.
pub struct EndpointRegistry {
    endpoints: Arc<RwLock<HashMap<EndpointId, RemoteHandle>>>,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self {
            endpoints: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register or replace the remote for an endpoint
    pub async fn register(&self, id: EndpointId, remote: RemoteHandle) {
        let mut endpoints = self.endpoints.write().await;
        if endpoints.insert(id.clone(), remote).is_some() {
            debug!("Replaced remote for endpoint: {}", id);
        } else {
            debug!("Registered endpoint: {}", id);
        }
    }

    /// Look up the remote for an endpoint, if registered
    pub async fn resolve(&self, id: &EndpointId) -> Option<RemoteHandle> {
        let endpoints = self.endpoints.read().await;
        endpoints.get(id).cloned()
    }

    /// Look up the remote for an endpoint, failing when it is absent
    pub async fn require(&self, id: &EndpointId) -> Result<RemoteHandle> {
        self.resolve(id)
            .await
            .ok_or_else(|| CoreError::EndpointNotFound(id.clone()))
    }

    /// Ids of all registered endpoints
    pub async fn all_ids(&self) -> BTreeSet<EndpointId> {
        let endpoints = self.endpoints.read().await;
        endpoints.keys().cloned().collect()
    }

    /// Remove an endpoint, e.g. when its host shuts down.
    /// Plugin bindings pointing at it are left in place.
    pub async fn deregister(&self, id: &EndpointId) -> Option<RemoteHandle> {
        let mut endpoints = self.endpoints.write().await;
        let removed = endpoints.remove(id);
        if removed.is_some() {
            debug!("Deregistered endpoint: {}", id);
        }
        removed
    }

    pub async fn contains(&self, id: &EndpointId) -> bool {
        let endpoints = self.endpoints.read().await;
        endpoints.contains_key(id)
    }

    /// Get count of registered endpoints
    pub async fn endpoint_count(&self) -> usize {
        let endpoints = self.endpoints.read().await;
        endpoints.len()
    }
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self::new()
    }
}
