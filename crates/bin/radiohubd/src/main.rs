//! # radiohubd — radiohub daemon
//!
//! Composition root that wires the gateway radio driver into the radio
//! component and runs one service call against it.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and install logging
//! - Register a simulated gateway per configured radio when the virtual
//!   integration is enabled
//! - Set up one platform per radio; a gateway that does not answer is
//!   reported and skipped
//! - Run the service call given on the command line, if any
//! - Print the entity snapshots as JSON
//!
//! ```text
//! radiohubd [<service> [<json data>]]
//! radiohubd set_volume '{"entity_id": "radio.living_room", "volume": "60"}'
//! ```
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use radiohub_adapter_miio::MiioRadioPlatform;
use radiohub_adapter_virtual::{VirtualConnector, VirtualGateway};
use radiohub_app::executor::TokioExecutor;
use radiohub_app::services::radio_component::RadioComponent;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let request = ServiceRequest::from_args(std::env::args().skip(1))?;

    let connector = Arc::new(VirtualConnector::default());
    if config.integrations.virtual_enabled {
        for radio in &config.radios {
            connector.add_gateway(VirtualGateway::new(
                radio.host.clone(),
                radio.token.clone(),
            ));
            tracing::info!(host = %radio.host, "simulating gateway");
        }
    }
    if config.radios.is_empty() {
        tracing::warn!("no radio configured");
    }

    let component = RadioComponent::new(TokioExecutor);
    for radio in config.radios {
        let host = radio.host.clone();
        let platform = MiioRadioPlatform::new(radio, Arc::clone(&connector));
        match component.setup_platform(&platform).await {
            Ok(entity_ids) => tracing::info!(%host, ?entity_ids, "radio ready"),
            Err(err) if err.is_not_ready() => {
                tracing::warn!(%host, "gateway skipped, not ready");
            }
            Err(err) => {
                let context = format!("failed to set up radio at {host}");
                return Err(anyhow::Error::new(err).context(context));
            }
        }
    }

    if let Some(request) = request {
        let outcomes = component
            .handle_service_call(&request.service, request.data)
            .await
            .with_context(|| format!("service call `{}` rejected", request.service))?;
        for outcome in &outcomes {
            match &outcome.result {
                Ok(succeeded) => {
                    tracing::info!(entity_id = %outcome.entity_id, succeeded, "service call done");
                }
                Err(err) => {
                    tracing::error!(
                        entity_id = %outcome.entity_id,
                        error = %err,
                        "service call failed"
                    );
                }
            }
        }
    }

    let snapshot = serde_json::to_string_pretty(&component.entities())
        .context("failed to serialize entities")?;
    println!("{snapshot}");

    Ok(())
}

/// Service call given on the command line.
#[derive(Debug, PartialEq)]
struct ServiceRequest {
    service: String,
    data: serde_json::Value,
}

impl ServiceRequest {
    /// `[<service> [<json data>]]`; no arguments means no call.
    fn from_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Option<Self>> {
        let Some(service) = args.next() else {
            return Ok(None);
        };
        let data = match args.next() {
            Some(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("service data for `{service}` is not valid JSON"))?,
            None => serde_json::Value::Null,
        };
        if args.next().is_some() {
            anyhow::bail!("usage: radiohubd [<service> [<json data>]]");
        }
        Ok(Some(Self { service, data }))
    }
}
