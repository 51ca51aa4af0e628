//! Ownership table: which endpoint hosts which plugin

use crate::{EndpointId, PluginId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Endpoints that should hear about a plugin hosted on `owner`.
///
/// Every endpoint except the owner; nobody when the owner is unknown.
pub fn broadcast_targets<I>(owner: Option<&EndpointId>, endpoints: I) -> BTreeSet<EndpointId>
where
    I: IntoIterator<Item = EndpointId>,
{
    match owner {
        Some(owner) => endpoints.into_iter().filter(|id| id != owner).collect(),
        None => BTreeSet::new(),
    }
}

/// OwnershipTable maps each plugin to the single endpoint hosting it.
///
/// Bindings are overwrite-only: binding a plugin again moves it, and there
/// is no unbind. The bound endpoint does not have to be registered yet.
pub struct OwnershipTable {
    owners: Arc<RwLock<HashMap<PluginId, EndpointId>>>,
}

impl OwnershipTable {
    pub fn new() -> Self {
        Self {
            owners: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Bind a plugin to an endpoint, replacing any previous owner
    pub async fn bind(&self, plugin_id: PluginId, endpoint: EndpointId) {
        let mut owners = self.owners.write().await;
        match owners.insert(plugin_id.clone(), endpoint.clone()) {
            Some(previous) if previous != endpoint => {
                debug!("Moved plugin {} from {} to {}", plugin_id, previous, endpoint);
            }
            Some(_) => {}
            None => debug!("Bound plugin {} to {}", plugin_id, endpoint),
        }
    }

    /// Endpoint currently hosting the plugin
    pub async fn owner_of(&self, plugin_id: &PluginId) -> Option<EndpointId> {
        let owners = self.owners.read().await;
        owners.get(plugin_id).cloned()
    }

    /// All of `endpoints` except the plugin's owner, or none if it is unbound
    pub async fn others_of<I>(&self, plugin_id: &PluginId, endpoints: I) -> BTreeSet<EndpointId>
    where
        I: IntoIterator<Item = EndpointId>,
    {
        let owner = self.owner_of(plugin_id).await;
        broadcast_targets(owner.as_ref(), endpoints)
    }

    /// Plugins bound to the given endpoint
    pub async fn plugins_of(&self, endpoint: &EndpointId) -> BTreeSet<PluginId> {
        let owners = self.owners.read().await;
        owners
            .iter()
            .filter(|(_, owner)| *owner == endpoint)
            .map(|(plugin, _)| plugin.clone())
            .collect()
    }

    /// Copy of every binding, ordered by plugin id
    pub async fn snapshot(&self) -> BTreeMap<PluginId, EndpointId> {
        let owners = self.owners.read().await;
        owners.iter().map(|(p, e)| (p.clone(), e.clone())).collect()
    }

    pub async fn len(&self) -> usize {
        self.owners.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.owners.read().await.is_empty()
    }
}

impl Default for OwnershipTable {
    fn default() -> Self {
        Self::new()
    }
}
