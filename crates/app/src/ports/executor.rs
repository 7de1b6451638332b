//! Executor port — hand blocking work to the host's worker pool.

use std::future::Future;
use std::sync::Arc;

use radiohub_domain::error::RadioHubError;

/// Runs blocking jobs without stalling the cooperative loop.
///
/// Device calls are synchronous network requests; every one of them goes
/// through this port.
pub trait JobExecutor: Send + Sync {
    /// Run `job` on a worker and resolve with its return value.
    ///
    /// Resolves to [`RadioHubError::Job`] when the job could not complete
    /// (it panicked or the pool shut down).
    fn run_blocking<F, T>(&self, job: F) -> impl Future<Output = Result<T, RadioHubError>> + Send
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static;
}

impl<E: JobExecutor> JobExecutor for Arc<E> {
    fn run_blocking<F, T>(&self, job: F) -> impl Future<Output = Result<T, RadioHubError>> + Send
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        (**self).run_blocking(job)
    }
}
