//! Platform port — setup of the radios provided by one integration.

use std::future::Future;
use std::sync::Arc;

use radiohub_domain::error::RadioHubError;

use super::{JobExecutor, RadioDevice};

/// A radio platform (one integration, e.g. a gateway driver).
///
/// Setup happens once. When the device cannot be reached, setup resolves
/// to [`RadioHubError::NotReady`] and the host retries it later.
pub trait RadioPlatform {
    /// Unique name of the platform (e.g. `"xiaomi_miio"`).
    fn name(&self) -> &'static str;

    /// Connect to the configured devices and return one radio per device.
    ///
    /// Blocking checks go through `executor`.
    fn setup<E: JobExecutor>(
        &self,
        executor: &E,
    ) -> impl Future<Output = Result<Vec<Arc<dyn RadioDevice>>, RadioHubError>> + Send;
}
