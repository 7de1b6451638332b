//! Virtual gateway — in-memory FM radio answering miio requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde_json::{Value, json};

use radiohub_adapter_miio::transport::INFO_METHOD;
use radiohub_adapter_miio::verb::{FmVerb, STATUS_RUNNING};
use radiohub_adapter_miio::{MiioError, Token};

const STATUS_PAUSED: &str = "pause";
const DEFAULT_VOLUME: u8 = 40;
const MAX_VOLUME: u8 = 100;
const DEFAULT_FREE_SPACE: u64 = 2_097_152;

/// Error code returned for malformed params.
pub const ERROR_INVALID_PARAMS: i64 = -5001;
/// Error code returned for methods the gateway does not know.
pub const ERROR_UNKNOWN_METHOD: i64 = -32601;

/// One preset radio channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    pub id: i64,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: u8,
}

impl Channel {
    #[must_use]
    pub fn new(id: i64, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            kind: 0,
        }
    }
}

#[derive(Debug)]
struct FmState {
    playing: bool,
    volume: u8,
    current_program: i64,
    channels: Vec<Channel>,
    free_space: u64,
}

/// A simulated Xiaomi gateway with an FM radio.
///
/// Answers the FM verbs and `miIO.info`. Requests carrying a different
/// token, or sent while the gateway is offline, get no answer.
pub struct VirtualGateway {
    host: String,
    token: Token,
    model: String,
    mac_address: String,
    online: AtomicBool,
    state: Mutex<FmState>,
    requests: Mutex<Vec<(String, Value)>>,
}

impl VirtualGateway {
    #[must_use]
    pub fn new(host: impl Into<String>, token: Token) -> Self {
        let channels = vec![
            Channel::new(527_782_008, "http://live.xmcdn.com/live/1/64.m3u8"),
            Channel::new(527_782_023, "http://live.xmcdn.com/live/2/64.m3u8"),
        ];
        Self {
            host: host.into(),
            token,
            model: "lumi.gateway.v3".to_string(),
            mac_address: "34:CE:00:00:00:01".to_string(),
            online: AtomicBool::new(true),
            state: Mutex::new(FmState {
                playing: false,
                volume: DEFAULT_VOLUME,
                current_program: channels[0].id,
                channels,
                free_space: DEFAULT_FREE_SPACE,
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Replace the preset channels.
    #[must_use]
    pub fn with_channels(self, channels: Vec<Channel>) -> Self {
        {
            let mut state = self.lock_state();
            if let Some(first) = channels.first() {
                state.current_program = first.id;
            }
            state.channels = channels;
        }
        self
    }

    #[must_use]
    pub fn with_mac_address(mut self, mac_address: impl Into<String>) -> Self {
        self.mac_address = mac_address.into();
        self
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Simulate the gateway dropping off the network, or coming back.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.lock_state().playing
    }

    #[must_use]
    pub fn volume(&self) -> u8 {
        self.lock_state().volume
    }

    #[must_use]
    pub fn current_program(&self) -> i64 {
        self.lock_state().current_program
    }

    /// Every request received so far, answered or not.
    #[must_use]
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Answer one request the way the device would.
    ///
    /// # Errors
    ///
    /// [`MiioError::Unreachable`] when offline or when `token` does not
    /// match, [`MiioError::Device`] for unknown methods or bad params.
    pub fn handle(&self, token: &Token, method: &str, params: Value) -> Result<Value, MiioError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((method.to_string(), params.clone()));

        if !self.is_online() || token != &self.token {
            tracing::debug!(host = %self.host, method, "request dropped");
            return Err(MiioError::Unreachable {
                host: self.host.clone(),
            });
        }

        if method == INFO_METHOD {
            return Ok(self.info());
        }
        let Some(verb) = FmVerb::from_method(method) else {
            return Err(device_error(ERROR_UNKNOWN_METHOD, "Method not found."));
        };

        let mut state = self.lock_state();
        match verb {
            FmVerb::GetPropFm => Ok(json!({
                "current_status": if state.playing { STATUS_RUNNING } else { STATUS_PAUSED },
                "current_volume": state.volume,
                "current_program": state.current_program,
                "current_progress": 0,
                "current_duration": 0,
            })),
            FmVerb::PlayFm => {
                state.playing = match first_str(&params) {
                    Some("on") => true,
                    Some("off") => false,
                    _ => return Err(invalid_params()),
                };
                Ok(ok())
            }
            FmVerb::PlaySpecifyFm => {
                let id = params
                    .get("id")
                    .and_then(Value::as_i64)
                    .ok_or_else(invalid_params)?;
                if !state.channels.iter().any(|channel| channel.id == id) {
                    return Err(device_error(ERROR_INVALID_PARAMS, "unknown channel"));
                }
                state.current_program = id;
                state.playing = true;
                Ok(ok())
            }
            FmVerb::VolumeCtrlFm => {
                let volume = first_str(&params)
                    .and_then(|value| value.trim().parse::<u8>().ok())
                    .filter(|volume| *volume <= MAX_VOLUME)
                    .ok_or_else(invalid_params)?;
                state.volume = volume;
                Ok(ok())
            }
            FmVerb::GetChannels => {
                let start = params
                    .get("start")
                    .and_then(Value::as_u64)
                    .and_then(|start| usize::try_from(start).ok())
                    .unwrap_or(0);
                let page: Vec<&Channel> = state.channels.iter().skip(start).collect();
                Ok(json!({ "chs": page }))
            }
            FmVerb::GetMusicFreeSpace => Ok(json!([state.free_space])),
        }
    }

    fn info(&self) -> Value {
        json!({
            "model": self.model,
            "mac": self.mac_address,
            "fw_ver": "1.4.1_164",
            "hw_ver": "MW300",
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, FmState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn first_str(params: &Value) -> Option<&str> {
    params.get(0).and_then(Value::as_str)
}

fn ok() -> Value {
    json!(["ok"])
}

fn invalid_params() -> MiioError {
    device_error(ERROR_INVALID_PARAMS, "invalid params")
}

fn device_error(code: i64, message: &str) -> MiioError {
    MiioError::Device {
        code,
        message: message.to_string(),
    }
}
