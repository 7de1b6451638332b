//! Radio port — the contract every radio entity implements.
//!
//! The seven operations are synchronous and may block on the device. Each
//! one defaults to [`RadioHubError::NotImplemented`]; drivers override the
//! ones their hardware supports. [`RadioDeviceExt`] provides the
//! suspension-capable wrappers that defer those calls onto a
//! [`JobExecutor`].
//!
//! Return convention for operations:
//! - `Ok(true)`: the device accepted the command
//! - `Ok(false)`: the command failed, the driver already logged why
//! - `Err(_)`: contract-level failure (the operation is not supported)

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use radiohub_domain::device::Device;
use radiohub_domain::entity::AttributeValue;
use radiohub_domain::error::RadioHubError;
use radiohub_domain::service::RadioCommand;

use super::JobExecutor;

/// A controllable radio.
pub trait RadioDevice: Send + Sync {
    /// Display name, also used to derive the entity id.
    fn name(&self) -> &str;

    /// Stable identifier within the integration, if the device has one.
    fn unique_id(&self) -> Option<&str> {
        None
    }

    /// Whether the radio is currently playing. May block on the device.
    fn is_on(&self) -> bool;

    /// Whether the host should poll this radio for state.
    fn should_poll(&self) -> bool {
        true
    }

    /// Descriptive attributes for the entity snapshot. May block on the device.
    fn state_attributes(&self) -> HashMap<String, AttributeValue> {
        HashMap::new()
    }

    /// Descriptor of the physical device, from data captured at setup.
    ///
    /// Must not block.
    fn device_info(&self) -> Option<Device> {
        None
    }

    /// # Errors
    ///
    /// Returns [`RadioHubError::NotImplemented`] unless overridden.
    fn turn_on(&self, _activity: Option<&str>) -> Result<bool, RadioHubError> {
        Err(RadioHubError::NotImplemented("turn_on"))
    }

    /// # Errors
    ///
    /// Returns [`RadioHubError::NotImplemented`] unless overridden.
    fn turn_off(&self, _activity: Option<&str>) -> Result<bool, RadioHubError> {
        Err(RadioHubError::NotImplemented("turn_off"))
    }

    /// # Errors
    ///
    /// Returns [`RadioHubError::NotImplemented`] unless overridden.
    fn toggle(&self, _activity: Option<&str>) -> Result<bool, RadioHubError> {
        Err(RadioHubError::NotImplemented("toggle"))
    }

    /// Play a url or a device-specific track identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RadioHubError::NotImplemented`] unless overridden.
    fn play_url(&self, _url: &str) -> Result<bool, RadioHubError> {
        Err(RadioHubError::NotImplemented("play_url"))
    }

    /// # Errors
    ///
    /// Returns [`RadioHubError::NotImplemented`] unless overridden.
    fn set_volume(&self, _volume: &str) -> Result<bool, RadioHubError> {
        Err(RadioHubError::NotImplemented("set_volume"))
    }

    /// # Errors
    ///
    /// Returns [`RadioHubError::NotImplemented`] unless overridden.
    fn play_next(&self) -> Result<bool, RadioHubError> {
        Err(RadioHubError::NotImplemented("play_next"))
    }

    /// # Errors
    ///
    /// Returns [`RadioHubError::NotImplemented`] unless overridden.
    fn play_prev(&self) -> Result<bool, RadioHubError> {
        Err(RadioHubError::NotImplemented("play_prev"))
    }

    /// Route a validated command to the matching operation.
    ///
    /// # Errors
    ///
    /// Propagates the error of the routed operation.
    fn execute(&self, command: &RadioCommand) -> Result<bool, RadioHubError> {
        match command {
            RadioCommand::TurnOn { activity } => self.turn_on(activity.as_deref()),
            RadioCommand::TurnOff { activity } => self.turn_off(activity.as_deref()),
            RadioCommand::Toggle { activity } => self.toggle(activity.as_deref()),
            RadioCommand::PlayNext => self.play_next(),
            RadioCommand::PlayPrev => self.play_prev(),
            RadioCommand::PlayUrl { url } => self.play_url(url),
            RadioCommand::SetVolume { volume } => self.set_volume(volume),
        }
    }
}

/// State read from a radio in one poll.
#[derive(Debug, Clone, PartialEq)]
pub struct PolledState {
    pub is_on: bool,
    pub attributes: HashMap<String, AttributeValue>,
}

/// Suspension-capable wrappers around [`RadioDevice`].
///
/// Each wrapper moves the blocking call onto the executor and resolves with
/// its result, without blocking the caller.
pub trait RadioDeviceExt {
    fn async_turn_on<E: JobExecutor>(
        &self,
        executor: &E,
        activity: Option<String>,
    ) -> impl Future<Output = Result<bool, RadioHubError>> + Send;

    fn async_turn_off<E: JobExecutor>(
        &self,
        executor: &E,
        activity: Option<String>,
    ) -> impl Future<Output = Result<bool, RadioHubError>> + Send;

    fn async_toggle<E: JobExecutor>(
        &self,
        executor: &E,
        activity: Option<String>,
    ) -> impl Future<Output = Result<bool, RadioHubError>> + Send;

    fn async_play_url<E: JobExecutor>(
        &self,
        executor: &E,
        url: String,
    ) -> impl Future<Output = Result<bool, RadioHubError>> + Send;

    fn async_set_volume<E: JobExecutor>(
        &self,
        executor: &E,
        volume: String,
    ) -> impl Future<Output = Result<bool, RadioHubError>> + Send;

    fn async_play_next<E: JobExecutor>(
        &self,
        executor: &E,
    ) -> impl Future<Output = Result<bool, RadioHubError>> + Send;

    fn async_play_prev<E: JobExecutor>(
        &self,
        executor: &E,
    ) -> impl Future<Output = Result<bool, RadioHubError>> + Send;

    /// Run [`RadioDevice::execute`] on the executor.
    fn async_execute<E: JobExecutor>(
        &self,
        executor: &E,
        command: RadioCommand,
    ) -> impl Future<Output = Result<bool, RadioHubError>> + Send;

    /// Read `is_on` and `state_attributes` in a single blocking job.
    fn async_poll<E: JobExecutor>(
        &self,
        executor: &E,
    ) -> impl Future<Output = Result<PolledState, RadioHubError>> + Send;
}

impl<R> RadioDeviceExt for Arc<R>
where
    R: RadioDevice + ?Sized + 'static,
{
    fn async_turn_on<E: JobExecutor>(
        &self,
        executor: &E,
        activity: Option<String>,
    ) -> impl Future<Output = Result<bool, RadioHubError>> + Send {
        self.async_execute(executor, RadioCommand::TurnOn { activity })
    }

    fn async_turn_off<E: JobExecutor>(
        &self,
        executor: &E,
        activity: Option<String>,
    ) -> impl Future<Output = Result<bool, RadioHubError>> + Send {
        self.async_execute(executor, RadioCommand::TurnOff { activity })
    }

    fn async_toggle<E: JobExecutor>(
        &self,
        executor: &E,
        activity: Option<String>,
    ) -> impl Future<Output = Result<bool, RadioHubError>> + Send {
        self.async_execute(executor, RadioCommand::Toggle { activity })
    }

    fn async_play_url<E: JobExecutor>(
        &self,
        executor: &E,
        url: String,
    ) -> impl Future<Output = Result<bool, RadioHubError>> + Send {
        self.async_execute(executor, RadioCommand::PlayUrl { url })
    }

    fn async_set_volume<E: JobExecutor>(
        &self,
        executor: &E,
        volume: String,
    ) -> impl Future<Output = Result<bool, RadioHubError>> + Send {
        self.async_execute(executor, RadioCommand::SetVolume { volume })
    }

    fn async_play_next<E: JobExecutor>(
        &self,
        executor: &E,
    ) -> impl Future<Output = Result<bool, RadioHubError>> + Send {
        self.async_execute(executor, RadioCommand::PlayNext)
    }

    fn async_play_prev<E: JobExecutor>(
        &self,
        executor: &E,
    ) -> impl Future<Output = Result<bool, RadioHubError>> + Send {
        self.async_execute(executor, RadioCommand::PlayPrev)
    }

    fn async_execute<E: JobExecutor>(
        &self,
        executor: &E,
        command: RadioCommand,
    ) -> impl Future<Output = Result<bool, RadioHubError>> + Send {
        let radio = Arc::clone(self);
        let job = executor.run_blocking(move || radio.execute(&command));
        async move { job.await? }
    }

    fn async_poll<E: JobExecutor>(
        &self,
        executor: &E,
    ) -> impl Future<Output = Result<PolledState, RadioHubError>> + Send {
        let radio = Arc::clone(self);
        executor.run_blocking(move || PolledState {
            is_on: radio.is_on(),
            attributes: radio.state_attributes(),
        })
    }
}
