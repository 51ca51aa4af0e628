//! Static routing plan derived from a configuration

use crate::ownership::broadcast_targets;
use crate::{EndpointId, PluginId, RouterConfig};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Where calls for one plugin go
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PluginRoute {
    pub plugin: PluginId,
    pub owner: EndpointId,
    /// False when the owner is not among the declared endpoints
    pub owner_declared: bool,
    /// Endpoints that receive the plugin's exports and package metadata
    pub broadcast_targets: BTreeSet<EndpointId>,
}

/// Routes for every configured plugin, ordered by plugin id
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RoutingPlan {
    pub endpoints: BTreeSet<EndpointId>,
    pub routes: Vec<PluginRoute>,
}

impl RoutingPlan {
    pub fn from_config(config: &RouterConfig) -> Self {
        let endpoints: BTreeSet<EndpointId> = config.endpoints.iter().cloned().collect();

        // Later bindings overwrite earlier ones
        let owners: BTreeMap<&PluginId, &EndpointId> = config
            .bindings
            .iter()
            .map(|binding| (&binding.plugin, &binding.endpoint))
            .collect();

        let routes = owners
            .into_iter()
            .map(|(plugin, owner)| PluginRoute {
                plugin: plugin.clone(),
                owner: owner.clone(),
                owner_declared: endpoints.contains(owner),
                broadcast_targets: broadcast_targets(Some(owner), endpoints.iter().cloned()),
            })
            .collect();

        Self { endpoints, routes }
    }

    pub fn route_for(&self, plugin: &PluginId) -> Option<&PluginRoute> {
        self.routes.iter().find(|route| &route.plugin == plugin)
    }

    /// Routes whose owner was never declared
    pub fn stale_routes(&self) -> impl Iterator<Item = &PluginRoute> {
        self.routes.iter().filter(|route| !route.owner_declared)
    }
}
