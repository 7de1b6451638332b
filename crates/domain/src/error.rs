//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors. Device failures stay inside the
//! driver (logged and reported as `Ok(false)`); only setup failures cross a
//! port boundary, boxed into [`RadioHubError::NotReady`].

/// Boxed foreign error carried across port boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error for every radiohub operation.
#[derive(Debug, thiserror::Error)]
pub enum RadioHubError {
    /// A domain invariant or a service payload was rejected.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The addressed entity or platform does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The radio does not support the requested operation.
    #[error("operation `{0}` is not implemented by this radio")]
    NotImplemented(&'static str),

    /// The platform could not reach its device during setup.
    ///
    /// The host is expected to retry the setup later.
    #[error("platform `{platform}` is not ready")]
    NotReady {
        /// Platform that failed (e.g. `"xiaomi_miio"`).
        platform: String,
        /// Underlying transport failure.
        #[source]
        source: BoxError,
    },

    /// A blocking job could not be completed by the executor.
    #[error("background job failed")]
    Job(#[source] BoxError),
}

/// Why a value was rejected by domain validation.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A human readable name was empty.
    #[error("name must not be empty")]
    EmptyName,

    /// An entity id is not of the form `<domain>.<object_id>`.
    #[error("invalid entity id `{0}`")]
    InvalidEntityId(String),

    /// The service name is not part of the radio domain.
    #[error("unknown service `{0}`")]
    UnknownService(String),

    /// The service payload does not match the service schema.
    #[error("invalid data for service `{service}`")]
    InvalidServiceData {
        /// Service whose schema rejected the payload.
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// An addressed resource does not exist.
#[derive(Debug, thiserror::Error)]
#[error("{entity} `{id}` not found")]
pub struct NotFoundError {
    /// Kind of the missing resource (e.g. `"Entity"`).
    pub entity: &'static str,
    /// Identifier that was looked up.
    pub id: String,
}

impl RadioHubError {
    /// Whether the host should retry the operation later.
    #[must_use]
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }
}
