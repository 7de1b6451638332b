//! In-process executor backed by tokio's blocking thread pool.

use std::future::Future;

use radiohub_domain::error::RadioHubError;

use crate::ports::JobExecutor;

/// [`JobExecutor`] using [`tokio::task::spawn_blocking`].
///
/// Must be awaited from within a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioExecutor;

impl JobExecutor for TokioExecutor {
    fn run_blocking<F, T>(&self, job: F) -> impl Future<Output = Result<T, RadioHubError>> + Send
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        async move {
            tokio::task::spawn_blocking(job)
                .await
                .map_err(|err| RadioHubError::Job(Box::new(err)))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn should_resolve_with_job_result() {
        let value = TokioExecutor.run_blocking(|| 40 + 2).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn should_report_panicking_job_as_job_error() {
        let result = TokioExecutor
            .run_blocking(|| -> u8 { panic!("device driver blew up") })
            .await;
        assert!(matches!(result, Err(RadioHubError::Job(_))));
    }

    #[tokio::test]
    async fn should_run_through_shared_executor() {
        let executor = Arc::new(TokioExecutor);
        let value = executor.run_blocking(|| "done").await.unwrap();
        assert_eq!(value, "done");
    }
}
