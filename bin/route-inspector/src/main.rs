use anyhow::{Context, Result};
use remote_core::{RouterConfig, RoutingPlan};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "ROUTE_INSPECTOR_CONFIG";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = config_path()?;
    info!("Loading routing config from {}", path);

    let config = RouterConfig::from_file(&path)
        .with_context(|| format!("failed to load routing config {}", path))?;
    let plan = RoutingPlan::from_config(&config);

    for route in plan.stale_routes() {
        warn!(
            "Plugin {} is bound to {}, which is not a declared endpoint",
            route.plugin, route.owner
        );
    }
    info!(
        "{} endpoints, {} routed plugins",
        plan.endpoints.len(),
        plan.routes.len()
    );

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

/// First CLI argument, falling back to the environment
fn config_path() -> Result<String> {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .with_context(|| format!("usage: route-inspector <config.yaml> (or set {})", CONFIG_ENV))
}
