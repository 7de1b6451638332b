//! Service — the commands a host can route to radio entities.
//!
//! Seven services exist in the `radio` domain. Each accepts a JSON payload
//! checked against its schema (see [`schema`]) before any radio is touched:
//!
//! | Service | Required | Optional |
//! |---------|----------|----------|
//! | `turn_on`, `turn_off`, `toggle` | | `entity_id`, `activity` |
//! | `play_next`, `play_prev` | | `entity_id` |
//! | `play_url` | `url` | `entity_id` |
//! | `set_volume` | `volume` | `entity_id` |

pub mod schema;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Payload key holding the targeted entity ids.
pub const ATTR_ENTITY_ID: &str = "entity_id";
/// Payload key holding the optional activity name.
pub const ATTR_ACTIVITY: &str = "activity";
/// Payload key holding the url (or track id) to play.
pub const ATTR_URL: &str = "url";
/// Payload key holding the volume.
pub const ATTR_VOLUME: &str = "volume";

/// Name of a radio service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadioService {
    TurnOn,
    TurnOff,
    Toggle,
    PlayNext,
    PlayPrev,
    PlayUrl,
    SetVolume,
}

impl RadioService {
    /// Every service, in registration order.
    pub const ALL: [Self; 7] = [
        Self::TurnOff,
        Self::TurnOn,
        Self::PlayNext,
        Self::PlayPrev,
        Self::Toggle,
        Self::PlayUrl,
        Self::SetVolume,
    ];

    /// Wire name of the service.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TurnOn => "turn_on",
            Self::TurnOff => "turn_off",
            Self::Toggle => "toggle",
            Self::PlayNext => "play_next",
            Self::PlayPrev => "play_prev",
            Self::PlayUrl => "play_url",
            Self::SetVolume => "set_volume",
        }
    }
}

impl fmt::Display for RadioService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RadioService {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownService(s.to_string()))
    }
}

/// A validated command for a single radio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioCommand {
    TurnOn { activity: Option<String> },
    TurnOff { activity: Option<String> },
    Toggle { activity: Option<String> },
    PlayNext,
    PlayPrev,
    PlayUrl { url: String },
    SetVolume { volume: String },
}

impl RadioCommand {
    /// The service this command belongs to.
    #[must_use]
    pub fn service(&self) -> RadioService {
        match self {
            Self::TurnOn { .. } => RadioService::TurnOn,
            Self::TurnOff { .. } => RadioService::TurnOff,
            Self::Toggle { .. } => RadioService::Toggle,
            Self::PlayNext => RadioService::PlayNext,
            Self::PlayPrev => RadioService::PlayPrev,
            Self::PlayUrl { .. } => RadioService::PlayUrl,
            Self::SetVolume { .. } => RadioService::SetVolume,
        }
    }
}

/// A service call: a command plus the entities it is addressed to.
///
/// `targets == None` addresses every radio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCall {
    pub targets: Option<Vec<String>>,
    pub command: RadioCommand,
}

impl ServiceCall {
    /// Validate `data` against the schema of `service`.
    ///
    /// A `null` payload is treated as an empty object.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownService`] for a name outside the
    /// radio domain, or [`ValidationError::InvalidServiceData`] when the
    /// payload does not match the schema.
    pub fn parse(service: &str, data: serde_json::Value) -> Result<Self, ValidationError> {
        let service: RadioService = service.parse()?;
        let data = match data {
            serde_json::Value::Null => serde_json::Value::Object(serde_json::Map::new()),
            other => other,
        };
        schema::parse(service, data)
    }

    #[must_use]
    pub fn new(command: RadioCommand, targets: Option<Vec<String>>) -> Self {
        Self { targets, command }
    }

    /// Turn all or the given radios on.
    #[must_use]
    pub fn turn_on(activity: Option<&str>, targets: Option<Vec<String>>) -> Self {
        Self::new(
            RadioCommand::TurnOn {
                activity: activity.map(str::to_string),
            },
            targets,
        )
    }

    /// Turn all or the given radios off.
    #[must_use]
    pub fn turn_off(activity: Option<&str>, targets: Option<Vec<String>>) -> Self {
        Self::new(
            RadioCommand::TurnOff {
                activity: activity.map(str::to_string),
            },
            targets,
        )
    }

    /// Toggle all or the given radios.
    #[must_use]
    pub fn toggle(activity: Option<&str>, targets: Option<Vec<String>>) -> Self {
        Self::new(
            RadioCommand::Toggle {
                activity: activity.map(str::to_string),
            },
            targets,
        )
    }

    #[must_use]
    pub fn play_next(targets: Option<Vec<String>>) -> Self {
        Self::new(RadioCommand::PlayNext, targets)
    }

    #[must_use]
    pub fn play_prev(targets: Option<Vec<String>>) -> Self {
        Self::new(RadioCommand::PlayPrev, targets)
    }

    /// Play a url (or channel id) on all or the given radios.
    #[must_use]
    pub fn play_url(url: impl Into<String>, targets: Option<Vec<String>>) -> Self {
        Self::new(RadioCommand::PlayUrl { url: url.into() }, targets)
    }

    /// Set the volume of all or the given radios.
    #[must_use]
    pub fn set_volume(volume: impl Into<String>, targets: Option<Vec<String>>) -> Self {
        Self::new(
            RadioCommand::SetVolume {
                volume: volume.into(),
            },
            targets,
        )
    }

    #[must_use]
    pub fn service(&self) -> RadioService {
        self.command.service()
    }

    /// Rebuild the JSON payload for this call, omitting absent keys.
    #[must_use]
    pub fn to_data(&self) -> serde_json::Value {
        let mut data = serde_json::Map::new();
        match &self.command {
            RadioCommand::TurnOn { activity }
            | RadioCommand::TurnOff { activity }
            | RadioCommand::Toggle { activity } => {
                if let Some(activity) = activity {
                    data.insert(ATTR_ACTIVITY.to_string(), activity.clone().into());
                }
            }
            RadioCommand::PlayNext | RadioCommand::PlayPrev => {}
            RadioCommand::PlayUrl { url } => {
                data.insert(ATTR_URL.to_string(), url.clone().into());
            }
            RadioCommand::SetVolume { volume } => {
                data.insert(ATTR_VOLUME.to_string(), volume.clone().into());
            }
        }
        if let Some(targets) = &self.targets {
            data.insert(ATTR_ENTITY_ID.to_string(), targets.clone().into());
        }
        serde_json::Value::Object(data)
    }
}
