//! Registry service binary

use registry_core::{InMemoryFunding, InMemoryIdentityGate, ParticipantId, StaticAuthority};
use registry_service::{spawn_registry_service, ServiceConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Freehold Registry Service");

    // Load configuration
    let config = ServiceConfig::from_env()?;

    let identity = Arc::new(InMemoryIdentityGate::new());
    let authority = Arc::new(StaticAuthority::new(
        config.administrators.iter().map(|a| ParticipantId::new(a.as_str())),
    ));
    let funding = Arc::new(InMemoryFunding::new());

    let handle = spawn_registry_service(config, identity, authority, funding);
    tracing::info!("Registry actor running");

    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down registry service");
    handle.shutdown().await?;

    Ok(())
}
