//! Device — the physical unit a radio entity represents.
//!
//! Built by a driver from what the device reports about itself at setup
//! (model, MAC address, firmware and hardware versions).

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::DeviceId;

/// Descriptor of a physical radio device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    /// Integration that provided this device (e.g. `"xiaomi_miio"`).
    pub integration: String,
    /// Stable id within the integration, e.g. `"<model>-<mac>"`.
    pub unique_id: Option<String>,
    pub firmware_version: Option<String>,
    pub hardware_version: Option<String>,
}

impl Device {
    /// Start building a device.
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }
}

/// Builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    name: String,
    manufacturer: Option<String>,
    model: Option<String>,
    integration: String,
    unique_id: Option<String>,
    firmware_version: Option<String>,
    hardware_version: Option<String>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn integration(mut self, integration: impl Into<String>) -> Self {
        self.integration = integration.into();
        self
    }

    #[must_use]
    pub fn unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    #[must_use]
    pub fn firmware_version(mut self, version: impl Into<String>) -> Self {
        self.firmware_version = Some(version.into());
        self
    }

    #[must_use]
    pub fn hardware_version(mut self, version: impl Into<String>) -> Self {
        self.hardware_version = Some(version.into());
        self
    }

    /// Validate and build the device.
    ///
    /// Without an explicit id, a device with a unique id gets the stable id
    /// derived from it, and a random one otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] when the name is blank.
    pub fn build(self) -> Result<Device, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let id = self.id.unwrap_or_else(|| match &self.unique_id {
            Some(unique_id) => DeviceId::for_unique_id(&self.integration, unique_id),
            None => DeviceId::new(),
        });
        Ok(Device {
            id,
            name: self.name,
            manufacturer: self.manufacturer,
            model: self.model,
            integration: self.integration,
            unique_id: self.unique_id,
            firmware_version: self.firmware_version,
            hardware_version: self.hardware_version,
        })
    }
}
