//! miio adapter error types.

use radiohub_domain::error::BoxError;

/// Errors raised by a miio device handle.
#[derive(Debug, thiserror::Error)]
pub enum MiioError {
    /// No reply from the device (wrong address, device offline, bad token).
    #[error("device at {host} did not answer")]
    Unreachable {
        /// Address that was tried.
        host: String,
    },

    /// The device answered with an error object.
    #[error("device returned error {code}: {message}")]
    Device {
        /// Error code reported by the device.
        code: i64,
        /// Error message reported by the device.
        message: String,
    },

    /// The reply could not be decoded into the expected shape.
    #[error("unexpected reply to `{method}`")]
    UnexpectedReply {
        /// Method whose reply was malformed.
        method: String,
        #[source]
        source: serde_json::Error,
    },

    /// Any other failure of the underlying client library.
    #[error("transport error")]
    Transport(#[source] BoxError),
}
