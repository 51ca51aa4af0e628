//! Core types for routing plugin calls between plugin host endpoints
//!
//! This library provides:
//! - Endpoint registry mapping host ids to their remote call interfaces
//! - Ownership table recording which host runs which plugin
//! - The remote call interface every plugin host implements
//! - Routing configuration and the static routing plan derived from it

pub mod config;
pub mod endpoint;
pub mod error;
pub mod ownership;
pub mod plan;
pub mod registry;
pub mod remote;

pub use config::{BindingConfig, RouterConfig};
pub use endpoint::{
    ArgIndex, CallId, ConfigStorage, EndpointId, LocalMethodCall, MethodCall, PluginId,
    PluginPackage, ProxyNameDefinition,
};
pub use error::{CoreError, RemoteError, Result};
pub use ownership::{broadcast_targets, OwnershipTable};
pub use plan::{PluginRoute, RoutingPlan};
pub use registry::{EndpointRegistry, RemoteHandle};
pub use remote::{PluginHostRemote, RemoteResult};
