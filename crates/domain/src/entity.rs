//! Entity — the polled, host-visible snapshot of one radio.
//!
//! An entity carries the on/off state derived from the last status query
//! and the descriptive attributes reported by the device. It holds no
//! derived state beyond that snapshot.

mod attribute_value;
mod state;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use attribute_value::AttributeValue;
pub use state::EntityState;

use crate::error::ValidationError;
use crate::id::{DeviceId, EntityId};
use crate::time::{Timestamp, now};

/// Snapshot of a radio entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub device_id: Option<DeviceId>,
    /// Host-facing id, e.g. `radio.kitchen_radio`.
    pub entity_id: String,
    pub friendly_name: String,
    pub state: EntityState,
    pub attributes: HashMap<String, AttributeValue>,
    pub last_changed: Timestamp,
    pub last_updated: Timestamp,
}

impl Entity {
    /// Start building an entity.
    #[must_use]
    pub fn builder() -> EntityBuilder {
        EntityBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] when the friendly name is blank,
    /// or [`ValidationError::InvalidEntityId`] when `entity_id` is malformed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.friendly_name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !is_valid_entity_id(&self.entity_id) {
            return Err(ValidationError::InvalidEntityId(self.entity_id.clone()));
        }
        Ok(())
    }

    /// Record a freshly polled state.
    ///
    /// `last_updated` always moves; `last_changed` only moves when the
    /// state actually differs.
    pub fn update_state(&mut self, state: EntityState, ts: Timestamp) {
        if self.state != state {
            self.state = state;
            self.last_changed = ts;
        }
        self.last_updated = ts;
    }

    /// Replace all attributes with the freshly polled set.
    pub fn replace_attributes(&mut self, attributes: HashMap<String, AttributeValue>) {
        self.attributes = attributes;
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}

/// Whether `value` is a `<domain>.<object_id>` entity id.
///
/// Both halves must be non-empty and made of lowercase ASCII letters,
/// digits and underscores, without leading or trailing underscores.
#[must_use]
pub fn is_valid_entity_id(value: &str) -> bool {
    fn valid_part(part: &str) -> bool {
        !part.is_empty()
            && !part.starts_with('_')
            && !part.ends_with('_')
            && part
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    }

    value
        .split_once('.')
        .is_some_and(|(domain, object_id)| valid_part(domain) && valid_part(object_id))
}

/// Builder for [`Entity`].
#[derive(Debug, Default)]
pub struct EntityBuilder {
    id: Option<EntityId>,
    device_id: Option<DeviceId>,
    entity_id: String,
    friendly_name: String,
    state: EntityState,
    attributes: HashMap<String, AttributeValue>,
}

impl EntityBuilder {
    #[must_use]
    pub fn id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn device_id(mut self, device_id: DeviceId) -> Self {
        self.device_id = Some(device_id);
        self
    }

    #[must_use]
    pub fn entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = entity_id.into();
        self
    }

    #[must_use]
    pub fn friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = name.into();
        self
    }

    #[must_use]
    pub fn state(mut self, state: EntityState) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn attributes(mut self, attributes: HashMap<String, AttributeValue>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Validate and build the entity, stamping both timestamps with now.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when an invariant does not hold.
    pub fn build(self) -> Result<Entity, ValidationError> {
        let ts = now();
        let entity = Entity {
            id: self.id.unwrap_or_default(),
            device_id: self.device_id,
            entity_id: self.entity_id,
            friendly_name: self.friendly_name,
            state: self.state,
            attributes: self.attributes,
            last_changed: ts,
            last_updated: ts,
        };
        entity.validate()?;
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radio() -> Entity {
        Entity::builder()
            .entity_id("radio.kitchen")
            .friendly_name("Kitchen")
            .state(EntityState::Off)
            .build()
            .unwrap()
    }

    #[test]
    fn should_build_valid_entity() {
        let entity = Entity::builder()
            .entity_id("radio.kitchen")
            .friendly_name("Kitchen")
            .attribute("hidden", "true")
            .build()
            .unwrap();
        assert_eq!(entity.state, EntityState::Unknown);
        assert_eq!(
            entity.get_attribute("hidden"),
            Some(&AttributeValue::String("true".to_string()))
        );
        assert_eq!(entity.last_changed, entity.last_updated);
    }

    #[test]
    fn should_reject_empty_friendly_name() {
        let result = Entity::builder().entity_id("radio.kitchen").build();
        assert!(matches!(result, Err(ValidationError::EmptyName)));
    }

    #[test]
    fn should_reject_malformed_entity_id() {
        let result = Entity::builder()
            .entity_id("Radio Kitchen")
            .friendly_name("Kitchen")
            .build();
        assert!(matches!(result, Err(ValidationError::InvalidEntityId(_))));
    }

    #[test]
    fn should_move_last_changed_only_when_state_differs() {
        let mut entity = radio();
        let first = entity.last_changed;

        let later = first + chrono::Duration::seconds(30);
        entity.update_state(EntityState::Off, later);
        assert_eq!(entity.last_changed, first);
        assert_eq!(entity.last_updated, later);

        let even_later = later + chrono::Duration::seconds(30);
        entity.update_state(EntityState::On, even_later);
        assert_eq!(entity.last_changed, even_later);
        assert_eq!(entity.state, EntityState::On);
    }

    #[test]
    fn should_replace_attributes() {
        let mut entity = radio();
        entity.replace_attributes(HashMap::from([(
            "space_free".to_string(),
            AttributeValue::Int(1024),
        )]));
        assert_eq!(entity.attributes.len(), 1);
        assert!(entity.get_attribute("hidden").is_none());
    }

    #[test]
    fn should_read_back_snapshot_with_device_reply_attributes() {
        let mut entity = radio();
        entity.replace_attributes(HashMap::from([
            ("hidden".to_string(), AttributeValue::from("true")),
            (
                "space_free".to_string(),
                AttributeValue::from(serde_json::json!(1_048_576)),
            ),
            (
                "channels".to_string(),
                AttributeValue::from(serde_json::json!({"chs": [{"id": 527_782_008}]})),
            ),
        ]));

        let json = serde_json::to_string(&entity).unwrap();
        let back: Entity = serde_json::from_str(&json).unwrap();

        assert_eq!(back, entity);
    }

    #[test]
    fn should_validate_entity_id_shapes() {
        assert!(is_valid_entity_id("radio.miio_radio_192_168_1_2"));
        assert!(is_valid_entity_id("group.all_radios"));
        assert!(!is_valid_entity_id("radio"));
        assert!(!is_valid_entity_id("radio."));
        assert!(!is_valid_entity_id(".kitchen"));
        assert!(!is_valid_entity_id("radio._kitchen"));
        assert!(!is_valid_entity_id("radio.Kitchen"));
        assert!(!is_valid_entity_id("radio.kitchen.extra"));
    }
}
