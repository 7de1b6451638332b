//! # radiohub-adapter-miio
//!
//! Driver for the FM radio built into Xiaomi gateways.
//!
//! ## Responsibilities
//! - Connect to a gateway through a [`MiioConnector`] and check it answers
//!   `miIO.info` before exposing a radio (setup is retried by the host
//!   when it does not)
//! - Map radio services onto FM request verbs ([`verb::FmVerb`])
//! - Report `current_status == "run"` as "on" and expose the channel list
//!   and free music space as state attributes
//!
//! The encrypted miio wire protocol is not implemented here. A
//! [`MiioConnector`] provided by the host opens device handles; the
//! `radiohub-adapter-virtual` crate provides an in-memory gateway.
//!
//! ## Dependency rule
//! Depends on `radiohub-domain` and `radiohub-app` (for port traits).

mod config;
mod error;
mod radio;
#[cfg(test)]
mod testing;
pub mod transport;
pub mod verb;

use std::future::Future;
use std::sync::Arc;

use radiohub_app::ports::{JobExecutor, RadioDevice, RadioPlatform};
use radiohub_domain::error::RadioHubError;

pub use config::{ConfigError, MiioRadioConfig, TOKEN_LENGTH, Token};
pub use error::MiioError;
pub use radio::XiaomiMiioRadio;
pub use transport::{DeviceInfo, MiioConnector, MiioTransport};

/// Name of the platform, also the `integration` of its devices.
pub const PLATFORM: &str = "xiaomi_miio";

/// Open a handle to the gateway and wrap it in a radio.
///
/// Blocks on the `miIO.info` exchange.
///
/// # Errors
///
/// Returns [`RadioHubError::NotReady`] when the gateway does not answer or
/// rejects the token.
pub fn connect<C: MiioConnector>(
    config: &MiioRadioConfig,
    connector: &C,
) -> Result<XiaomiMiioRadio<C::Transport>, RadioHubError> {
    tracing::info!(
        host = %config.host,
        token = %config.token.redacted(),
        "initializing gateway radio"
    );
    let transport = connector.connect(&config.host, &config.token);
    let info = transport.info().map_err(|err| {
        tracing::error!(host = %config.host, error = %err, "device unavailable or token incorrect");
        RadioHubError::NotReady {
            platform: PLATFORM.to_string(),
            source: Box::new(err),
        }
    })?;
    tracing::info!(
        model = %info.model,
        firmware = %info.firmware_version,
        hardware = %info.hardware_version,
        "gateway radio detected"
    );
    XiaomiMiioRadio::new(config.display_name(), transport, &info)
}

/// Radio platform for one configured gateway.
pub struct MiioRadioPlatform<C> {
    config: MiioRadioConfig,
    connector: Arc<C>,
}

impl<C: MiioConnector + 'static> MiioRadioPlatform<C> {
    #[must_use]
    pub fn new(config: MiioRadioConfig, connector: Arc<C>) -> Self {
        Self { config, connector }
    }

    #[must_use]
    pub fn config(&self) -> &MiioRadioConfig {
        &self.config
    }
}

impl<C: MiioConnector + 'static> RadioPlatform for MiioRadioPlatform<C> {
    fn name(&self) -> &'static str {
        PLATFORM
    }

    fn setup<E: JobExecutor>(
        &self,
        executor: &E,
    ) -> impl Future<Output = Result<Vec<Arc<dyn RadioDevice>>, RadioHubError>> + Send {
        let config = self.config.clone();
        let connector = Arc::clone(&self.connector);
        let job = executor.run_blocking(move || connect(&config, connector.as_ref()));
        async move {
            let radio = job.await??;
            Ok::<_, RadioHubError>(vec![Arc::new(radio) as Arc<dyn RadioDevice>])
        }
    }
}
