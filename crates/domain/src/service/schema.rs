//! Payload schemas for radio services.
//!
//! Each schema is a serde struct with `deny_unknown_fields`, so extra keys
//! are rejected. `entity_id` accepts a single id, a comma-separated list or
//! a JSON array; ids are trimmed, lowercased and checked. String fields
//! accept scalars and coerce them to strings.

use serde::{Deserialize, Deserializer};

use super::{RadioCommand, RadioService, ServiceCall};
use crate::entity::is_valid_entity_id;
use crate::error::ValidationError;

/// Schema shared by every service: only the optional targets.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BasePayload {
    #[serde(default, deserialize_with = "entity_ids")]
    entity_id: Option<Vec<String>>,
}

/// Schema of `turn_on`, `turn_off` and `toggle`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ActivityPayload {
    #[serde(default, deserialize_with = "entity_ids")]
    entity_id: Option<Vec<String>>,
    #[serde(default, deserialize_with = "optional_string")]
    activity: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlayUrlPayload {
    #[serde(default, deserialize_with = "entity_ids")]
    entity_id: Option<Vec<String>>,
    #[serde(deserialize_with = "string")]
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SetVolumePayload {
    #[serde(default, deserialize_with = "entity_ids")]
    entity_id: Option<Vec<String>>,
    #[serde(deserialize_with = "string")]
    volume: String,
}

pub(super) fn parse(
    service: RadioService,
    data: serde_json::Value,
) -> Result<ServiceCall, ValidationError> {
    let invalid = |source: serde_json::Error| ValidationError::InvalidServiceData {
        service: service.as_str(),
        source,
    };

    let call = match service {
        RadioService::TurnOn | RadioService::TurnOff | RadioService::Toggle => {
            let payload: ActivityPayload = serde_json::from_value(data).map_err(invalid)?;
            let activity = payload.activity;
            let command = match service {
                RadioService::TurnOn => RadioCommand::TurnOn { activity },
                RadioService::TurnOff => RadioCommand::TurnOff { activity },
                _ => RadioCommand::Toggle { activity },
            };
            ServiceCall::new(command, payload.entity_id)
        }
        RadioService::PlayNext | RadioService::PlayPrev => {
            let payload: BasePayload = serde_json::from_value(data).map_err(invalid)?;
            let command = if service == RadioService::PlayNext {
                RadioCommand::PlayNext
            } else {
                RadioCommand::PlayPrev
            };
            ServiceCall::new(command, payload.entity_id)
        }
        RadioService::PlayUrl => {
            let payload: PlayUrlPayload = serde_json::from_value(data).map_err(invalid)?;
            ServiceCall::play_url(payload.url, payload.entity_id)
        }
        RadioService::SetVolume => {
            let payload: SetVolumePayload = serde_json::from_value(data).map_err(invalid)?;
            ServiceCall::set_volume(payload.volume, payload.entity_id)
        }
    };
    Ok(call)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn entity_ids<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => value.split(',').map(str::to_string).collect(),
        OneOrMany::Many(values) => values,
    };

    raw.into_iter()
        .map(|id| {
            let id = id.trim().to_lowercase();
            if is_valid_entity_id(&id) {
                Ok(id)
            } else {
                Err(<D::Error as serde::de::Error>::custom(format!(
                    "invalid entity id `{id}`"
                )))
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(value) => Ok(value),
        serde_json::Value::Number(value) => Ok(value.to_string()),
        serde_json::Value::Bool(value) => Ok(value.to_string()),
        serde_json::Value::Null => Err(serde::de::Error::custom("expected a string, got null")),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            Err(serde::de::Error::custom("value should be a string"))
        }
    }
}

fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    string(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse_call(service: &str, data: serde_json::Value) -> Result<ServiceCall, ValidationError> {
        ServiceCall::parse(service, data)
    }

    #[test]
    fn should_accept_missing_targets_as_all_radios() {
        let call = parse_call("toggle", json!({})).unwrap();
        assert_eq!(call.targets, None);
        assert_eq!(call.command, RadioCommand::Toggle { activity: None });
    }

    #[test]
    fn should_split_comma_separated_entity_ids() {
        let call = parse_call("play_prev", json!({"entity_id": "radio.a, Radio.B"})).unwrap();
        assert_eq!(
            call.targets,
            Some(vec!["radio.a".to_string(), "radio.b".to_string()])
        );
    }

    #[test]
    fn should_accept_entity_id_list() {
        let call = parse_call(
            "turn_off",
            json!({"entity_id": ["radio.kitchen", "radio.office"]}),
        )
        .unwrap();
        assert_eq!(call.targets.unwrap().len(), 2);
    }

    #[test]
    fn should_reject_invalid_entity_id() {
        let err = parse_call("turn_on", json!({"entity_id": "kitchen"})).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidServiceData {
                service: "turn_on",
                ..
            }
        ));
    }

    #[test]
    fn should_reject_null_entity_id() {
        assert!(parse_call("turn_on", json!({"entity_id": null})).is_err());
    }

    #[test]
    fn should_require_url_for_play_url() {
        let err = parse_call("play_url", json!({"entity_id": "radio.kitchen"})).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidServiceData {
                service: "play_url",
                ..
            }
        ));
    }

    #[test]
    fn should_require_volume_for_set_volume() {
        assert!(parse_call("set_volume", json!({})).is_err());
    }

    #[test]
    fn should_coerce_numeric_volume_to_string() {
        let call = parse_call("set_volume", json!({"volume": 35})).unwrap();
        assert_eq!(
            call.command,
            RadioCommand::SetVolume {
                volume: "35".to_string()
            }
        );
    }

    #[test]
    fn should_reject_structured_url() {
        assert!(parse_call("play_url", json!({"url": {"id": 1}})).is_err());
    }

    #[test]
    fn should_reject_unknown_keys() {
        assert!(parse_call("play_next", json!({"activity": "party"})).is_err());
        assert!(parse_call("set_volume", json!({"volume": "1", "url": "2"})).is_err());
    }

    #[test]
    fn should_keep_non_numeric_url_for_the_radio_to_judge() {
        let call = parse_call("play_url", json!({"url": "http://stream"})).unwrap();
        assert_eq!(
            call.command,
            RadioCommand::PlayUrl {
                url: "http://stream".to_string()
            }
        );
    }
}
