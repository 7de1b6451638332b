//! Device handle port — the boundary to the external miio client.
//!
//! The encrypted UDP protocol lives in that client and is not part of this
//! crate. A handle exchanges one request per call: a method name plus JSON
//! params, answered by the JSON `result` of the device reply.

use serde::Deserialize;

use crate::config::Token;
use crate::error::MiioError;

/// Method returning the device's identity.
pub const INFO_METHOD: &str = "miIO.info";

/// Connection handle to one physical device.
///
/// Every call blocks until the device answers or the client gives up.
pub trait MiioTransport: Send + Sync + 'static {
    /// Send one request and return the `result` part of the reply.
    ///
    /// # Errors
    ///
    /// Returns a [`MiioError`] when the device is unreachable or answers
    /// with an error.
    fn send(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, MiioError>;

    /// Query the device identity.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send), plus [`MiioError::UnexpectedReply`]
    /// when the reply lacks the identity fields.
    fn info(&self) -> Result<DeviceInfo, MiioError> {
        let reply = self.send(INFO_METHOD, serde_json::json!([]))?;
        DeviceInfo::from_reply(reply)
    }
}

/// Opens device handles.
pub trait MiioConnector: Send + Sync {
    type Transport: MiioTransport;

    /// Create a handle for the device at `host`.
    ///
    /// Opening never talks to the device; the first request does.
    fn connect(&self, host: &str, token: &Token) -> Self::Transport;
}

/// Identity reported by `miIO.info`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceInfo {
    pub model: String,
    #[serde(rename = "mac")]
    pub mac_address: String,
    #[serde(rename = "fw_ver")]
    pub firmware_version: String,
    #[serde(rename = "hw_ver")]
    pub hardware_version: String,
}

impl DeviceInfo {
    /// Decode a `miIO.info` reply; unknown fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`MiioError::UnexpectedReply`] when a field is missing.
    pub fn from_reply(reply: serde_json::Value) -> Result<Self, MiioError> {
        serde_json::from_value(reply).map_err(|source| MiioError::UnexpectedReply {
            method: INFO_METHOD.to_string(),
            source,
        })
    }

    /// `"<model>-<mac>"`, stable across restarts.
    #[must_use]
    pub fn unique_id(&self) -> String {
        format!("{}-{}", self.model, self.mac_address)
    }
}
