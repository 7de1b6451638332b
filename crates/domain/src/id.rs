//! Typed identifiers backed by UUIDs.
//!
//! These are internal identities; the host-facing `radio.<object_id>`
//! string lives on [`Entity::entity_id`](crate::entity::Entity::entity_id).
//! Device ids are derived from the integration's unique id when the device
//! reports one, so the same gateway keeps its id across restarts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            #[must_use]
            pub fn as_uuid(self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Identifier of an [`Entity`](crate::entity::Entity).
    EntityId
);

define_id!(
    /// Identifier of a [`Device`](crate::device::Device).
    DeviceId
);

impl DeviceId {
    /// Stable id for the device `unique_id` of `integration`.
    #[must_use]
    pub fn for_unique_id(integration: &str, unique_id: &str) -> Self {
        let name = format!("{integration}:{unique_id}");
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()))
    }
}
