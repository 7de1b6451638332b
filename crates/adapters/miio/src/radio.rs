//! Gateway FM radio — one [`RadioDevice`] per device handle.

use std::collections::HashMap;

use serde_json::{Value, json};

use radiohub_app::ports::RadioDevice;
use radiohub_domain::device::Device;
use radiohub_domain::entity::AttributeValue;
use radiohub_domain::error::RadioHubError;

use crate::PLATFORM;
use crate::error::MiioError;
use crate::transport::{DeviceInfo, MiioTransport};
use crate::verb::{FmVerb, STATUS_RUNNING};

/// Radio backed by the FM tuner of a Xiaomi gateway.
///
/// Owns its device handle exclusively. Every operation is a single
/// request/response exchange, attempted once; failures are logged and
/// reported as `Ok(false)`.
pub struct XiaomiMiioRadio<T> {
    name: String,
    transport: T,
    unique_id: String,
    device: Device,
}

impl<T: MiioTransport> XiaomiMiioRadio<T> {
    /// Wrap a handle whose identity was already queried.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `name` is blank.
    pub fn new(name: String, transport: T, info: &DeviceInfo) -> Result<Self, RadioHubError> {
        let unique_id = info.unique_id();
        let device = Device::builder()
            .name(&name)
            .manufacturer("Xiaomi")
            .model(&info.model)
            .integration(PLATFORM)
            .unique_id(&unique_id)
            .firmware_version(&info.firmware_version)
            .hardware_version(&info.hardware_version)
            .build()?;
        Ok(Self {
            name,
            transport,
            unique_id,
            device,
        })
    }

    /// The device handle.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn request(&self, verb: FmVerb, params: Value) -> Result<Value, MiioError> {
        tracing::debug!(radio = %self.name, %verb, %params, "sending request");
        self.transport.send(verb.as_str(), params)
    }

    fn send_command(&self, verb: FmVerb, params: Value) -> bool {
        match self.request(verb, params) {
            Ok(_) => true,
            Err(err) => {
                tracing::error!(radio = %self.name, %verb, error = %err, "command failed");
                false
            }
        }
    }

    fn play_fm(&self, switch: &str) -> bool {
        self.send_command(FmVerb::PlayFm, json!([switch]))
    }

    fn query_attribute(&self, verb: FmVerb, params: Value) -> Option<AttributeValue> {
        match self.request(verb, params) {
            Ok(reply) => Some(AttributeValue::from(reply)),
            Err(err) => {
                tracing::warn!(radio = %self.name, %verb, error = %err, "attribute query failed");
                None
            }
        }
    }
}

impl<T: MiioTransport> RadioDevice for XiaomiMiioRadio<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn unique_id(&self) -> Option<&str> {
        Some(&self.unique_id)
    }

    /// Unreachable devices are reported off.
    fn is_on(&self) -> bool {
        match self.request(FmVerb::GetPropFm, json!([])) {
            Ok(status) => {
                status.get("current_status").and_then(Value::as_str) == Some(STATUS_RUNNING)
            }
            Err(err) => {
                tracing::debug!(
                    radio = %self.name,
                    error = %err,
                    "status query failed, reporting off"
                );
                false
            }
        }
    }

    fn state_attributes(&self) -> HashMap<String, AttributeValue> {
        let mut attributes = HashMap::from([("hidden".to_string(), AttributeValue::from("true"))]);
        if let Some(channels) = self.query_attribute(FmVerb::GetChannels, json!({"start": 0})) {
            attributes.insert("channels".to_string(), channels);
        }
        if let Some(space) = self.query_attribute(FmVerb::GetMusicFreeSpace, json!([])) {
            attributes.insert("space_free".to_string(), space);
        }
        attributes
    }

    fn device_info(&self) -> Option<Device> {
        Some(self.device.clone())
    }

    fn turn_on(&self, activity: Option<&str>) -> Result<bool, RadioHubError> {
        tracing::debug!(radio = %self.name, ?activity, "turning on");
        Ok(self.play_fm("on"))
    }

    fn turn_off(&self, activity: Option<&str>) -> Result<bool, RadioHubError> {
        tracing::debug!(radio = %self.name, ?activity, "turning off");
        Ok(self.play_fm("off"))
    }

    fn toggle(&self, _activity: Option<&str>) -> Result<bool, RadioHubError> {
        if self.is_on() {
            Ok(self.play_fm("off"))
        } else {
            Ok(self.play_fm("on"))
        }
    }

    /// `url` must hold a channel id; anything else is rejected before any
    /// request is sent.
    fn play_url(&self, url: &str) -> Result<bool, RadioHubError> {
        let id: i64 = match url.trim().parse() {
            Ok(id) => id,
            Err(err) => {
                tracing::error!(radio = %self.name, url, error = %err, "not a channel id");
                return Ok(false);
            }
        };
        let sent = self.send_command(FmVerb::PlaySpecifyFm, json!({"id": id, "type": 0}));
        if sent {
            tracing::info!(radio = %self.name, channel = id, "playing channel");
        }
        Ok(sent)
    }

    fn set_volume(&self, volume: &str) -> Result<bool, RadioHubError> {
        let sent = self.send_command(FmVerb::VolumeCtrlFm, json!([volume]));
        if sent {
            tracing::info!(radio = %self.name, volume, "volume set");
        }
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedTransport, requests};

    fn info() -> DeviceInfo {
        DeviceInfo {
            model: "lumi.gateway.v3".to_string(),
            mac_address: "34:CE:00:AA:BB:CC".to_string(),
            firmware_version: "1.4.1_164".to_string(),
            hardware_version: "MW300".to_string(),
        }
    }

    fn radio(transport: ScriptedTransport) -> XiaomiMiioRadio<ScriptedTransport> {
        XiaomiMiioRadio::new("Gateway FM".to_string(), transport, &info()).unwrap()
    }

    fn status(current_status: &str) -> ScriptedTransport {
        ScriptedTransport::new().reply(
            "get_prop_fm",
            json!({
                "current_status": current_status,
                "current_volume": 40,
                "current_program": 527_782_008
            }),
        )
    }

    #[test]
    fn should_report_on_when_status_is_run() {
        assert!(radio(status("run")).is_on());
    }

    #[test]
    fn should_report_off_when_status_is_pause() {
        assert!(!radio(status("pause")).is_on());
    }

    #[test]
    fn should_report_off_when_status_field_is_missing() {
        let transport = ScriptedTransport::new().reply("get_prop_fm", json!({}));
        assert!(!radio(transport).is_on());
    }

    #[test]
    fn should_report_off_when_device_is_unreachable() {
        assert!(!radio(ScriptedTransport::unreachable()).is_on());
    }

    #[test]
    fn should_send_play_fm_on_and_off() {
        let transport = ScriptedTransport::new();
        let log = transport.log();
        let radio = radio(transport);

        assert!(radio.turn_on(Some("morning")).unwrap());
        assert!(radio.turn_off(None).unwrap());

        assert_eq!(
            requests(&log),
            vec![
                ("play_fm".to_string(), json!(["on"])),
                ("play_fm".to_string(), json!(["off"])),
            ]
        );
    }

    #[test]
    fn should_toggle_off_when_running() {
        let transport = status("run");
        let log = transport.log();
        assert!(radio(transport).toggle(None).unwrap());

        let sent = requests(&log);
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, "get_prop_fm");
        assert_eq!(sent[1], ("play_fm".to_string(), json!(["off"])));
    }

    #[test]
    fn should_toggle_on_when_not_running() {
        let transport = status("pause");
        let log = transport.log();
        assert!(radio(transport).toggle(None).unwrap());
        assert_eq!(requests(&log)[1], ("play_fm".to_string(), json!(["on"])));
    }

    #[test]
    fn should_toggle_on_when_status_query_fails() {
        let transport = ScriptedTransport::unreachable();
        let log = transport.log();
        let result = radio(transport).toggle(None).unwrap();

        assert!(!result);
        assert_eq!(requests(&log)[1], ("play_fm".to_string(), json!(["on"])));
    }

    #[test]
    fn should_play_channel_by_numeric_id() {
        let transport = ScriptedTransport::new();
        let log = transport.log();
        assert!(radio(transport).play_url(" 527782008 ").unwrap());
        assert_eq!(
            requests(&log),
            vec![(
                "play_specify_fm".to_string(),
                json!({"id": 527_782_008, "type": 0})
            )]
        );
    }

    #[test]
    fn should_reject_non_numeric_url_without_request() {
        let transport = ScriptedTransport::new();
        let log = transport.log();
        let result = radio(transport).play_url("http://example.com/stream.mp3").unwrap();

        assert!(!result);
        assert!(requests(&log).is_empty());
    }

    #[test]
    fn should_report_failure_when_play_request_fails() {
        let result = radio(ScriptedTransport::unreachable()).play_url("12").unwrap();
        assert!(!result);
    }

    #[test]
    fn should_send_exactly_one_volume_request() {
        let transport = ScriptedTransport::new();
        let log = transport.log();
        assert!(radio(transport).set_volume("loud").unwrap());
        assert_eq!(
            requests(&log),
            vec![("volume_ctrl_fm".to_string(), json!(["loud"]))]
        );
    }

    #[test]
    fn should_report_failure_when_volume_request_fails() {
        let result = radio(ScriptedTransport::unreachable()).set_volume("40").unwrap();
        assert!(!result);
    }

    #[test]
    fn should_not_implement_next_and_previous() {
        let radio = radio(ScriptedTransport::new());
        assert!(matches!(
            radio.play_next(),
            Err(RadioHubError::NotImplemented("play_next"))
        ));
        assert!(matches!(
            radio.play_prev(),
            Err(RadioHubError::NotImplemented("play_prev"))
        ));
    }

    #[test]
    fn should_return_device_replies_as_attributes() {
        let channels = json!({
            "chs": [{"id": 527_782_008, "url": "http://live.xmcdn.com/live/1/64.m3u8", "type": 0}]
        });
        let transport = ScriptedTransport::new()
            .reply("get_channels", channels.clone())
            .reply("get_music_free_space", json!([1_048_576]));
        let log = transport.log();
        let attributes = radio(transport).state_attributes();

        assert_eq!(attributes.get("hidden"), Some(&AttributeValue::from("true")));
        assert_eq!(
            attributes.get("channels"),
            Some(&AttributeValue::Json(channels))
        );
        assert_eq!(
            attributes.get("space_free"),
            Some(&AttributeValue::Json(json!([1_048_576])))
        );
        assert_eq!(requests(&log)[0], ("get_channels".to_string(), json!({"start": 0})));
    }

    #[test]
    fn should_keep_hidden_marker_when_attribute_queries_fail() {
        let attributes = radio(ScriptedTransport::unreachable()).state_attributes();
        assert_eq!(attributes.len(), 1);
        assert!(attributes.contains_key("hidden"));
    }

    #[test]
    fn should_describe_device_from_info() {
        let radio = radio(ScriptedTransport::new());
        assert_eq!(radio.unique_id(), Some("lumi.gateway.v3-34:CE:00:AA:BB:CC"));
        let device = radio.device_info().unwrap();
        assert_eq!(device.name, "Gateway FM");
        assert_eq!(device.integration, "xiaomi_miio");
        assert_eq!(device.manufacturer.as_deref(), Some("Xiaomi"));
        assert_eq!(device.firmware_version.as_deref(), Some("1.4.1_164"));
    }

    #[test]
    fn should_reject_blank_name() {
        let result = XiaomiMiioRadio::new(" ".to_string(), ScriptedTransport::new(), &info());
        assert!(matches!(result, Err(RadioHubError::Validation(_))));
    }
}
