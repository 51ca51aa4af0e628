//! Plugin call routing between a coordinator and its plugin host endpoints
pub mod broadcaster;
pub mod forwarder;
pub mod metrics;
pub mod router;

#[cfg(test)]
mod testing;

pub use broadcaster::Broadcaster;
pub use forwarder::CallForwarder;
pub use metrics::{Operation, Outcome, RoutingMetrics};
pub use router::PluginRemoteRouter;
