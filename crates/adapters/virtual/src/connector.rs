//! Connector handing out handles to virtual gateways by host.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use radiohub_adapter_miio::{MiioConnector, MiioError, MiioTransport, Token};

use crate::gateway::VirtualGateway;

/// [`MiioConnector`] resolving hosts to registered [`VirtualGateway`]s.
///
/// Hosts without a gateway behave like addresses nothing answers on.
#[derive(Default)]
pub struct VirtualConnector {
    gateways: Mutex<HashMap<String, Arc<VirtualGateway>>>,
}

impl VirtualConnector {
    /// Register a gateway under its host, replacing any previous one.
    pub fn add_gateway(&self, gateway: VirtualGateway) -> Arc<VirtualGateway> {
        let gateway = Arc::new(gateway);
        self.gateways
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(gateway.host().to_string(), Arc::clone(&gateway));
        gateway
    }

    #[must_use]
    pub fn gateway(&self, host: &str) -> Option<Arc<VirtualGateway>> {
        self.gateways
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(host)
            .cloned()
    }
}

impl MiioConnector for VirtualConnector {
    type Transport = VirtualHandle;

    fn connect(&self, host: &str, token: &Token) -> VirtualHandle {
        tracing::debug!(host, token = %token.redacted(), "opening virtual handle");
        VirtualHandle {
            host: host.to_string(),
            token: token.clone(),
            gateway: self.gateway(host),
        }
    }
}

/// Handle to one virtual gateway.
pub struct VirtualHandle {
    host: String,
    token: Token,
    gateway: Option<Arc<VirtualGateway>>,
}

impl MiioTransport for VirtualHandle {
    fn send(&self, method: &str, params: Value) -> Result<Value, MiioError> {
        match &self.gateway {
            Some(gateway) => gateway.handle(&self.token, method, params),
            None => Err(MiioError::Unreachable {
                host: self.host.clone(),
            }),
        }
    }
}
