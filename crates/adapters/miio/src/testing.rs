//! Scripted device handle for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::error::MiioError;
use crate::transport::MiioTransport;

pub(crate) type RequestLog = Arc<Mutex<Vec<(String, Value)>>>;

/// Answers from a fixed table and records every request.
///
/// Methods without a scripted reply answer `["ok"]`.
pub(crate) struct ScriptedTransport {
    replies: HashMap<String, Value>,
    unreachable: bool,
    log: RequestLog,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self {
            replies: HashMap::new(),
            unreachable: false,
            log: RequestLog::default(),
        }
    }

    pub(crate) fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::new()
        }
    }

    pub(crate) fn reply(mut self, method: &str, value: Value) -> Self {
        self.replies.insert(method.to_string(), value);
        self
    }

    pub(crate) fn with_info(self) -> Self {
        self.reply(
            "miIO.info",
            json!({
                "model": "lumi.gateway.v3",
                "mac": "34:CE:00:AA:BB:CC",
                "fw_ver": "1.4.1_164",
                "hw_ver": "MW300"
            }),
        )
    }

    pub(crate) fn log(&self) -> RequestLog {
        Arc::clone(&self.log)
    }
}

impl MiioTransport for ScriptedTransport {
    fn send(&self, method: &str, params: Value) -> Result<Value, MiioError> {
        self.log
            .lock()
            .unwrap()
            .push((method.to_string(), params));
        if self.unreachable {
            return Err(MiioError::Unreachable {
                host: "192.0.2.1".to_string(),
            });
        }
        Ok(self
            .replies
            .get(method)
            .cloned()
            .unwrap_or_else(|| json!(["ok"])))
    }
}

pub(crate) fn requests(log: &RequestLog) -> Vec<(String, Value)> {
    log.lock().unwrap().clone()
}
