//! Method-call channel between the share handler and the app shell.
//!
//! The shell asks for data with inbound [`MethodCall`]s and receives
//! fire-and-forget [`ChannelMessage`]s. Nothing waits for the shell to
//! acknowledge a push.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{Result, ShareError};
use crate::state::SharedPayload;

pub const DEFAULT_CHANNEL_NAME: &str = "shared_channel";

/// Shell asks for the pending share (cold start).
pub const METHOD_GET_SHARED_DATA: &str = "getSharedData";

/// Handler pushes a share that arrived while the shell was running.
pub const METHOD_ON_SHARED: &str = "onShared";

/// Receives pushed share payloads.
pub trait SharedSink {
    fn notify(&self, method: &str, payload: &SharedPayload);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Value::Null,
        }
    }
}

/// Reply to a [`MethodCall`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodResult {
    Success { result: Value },
    NotImplemented,
    Error { code: String, message: String },
}

impl MethodResult {
    pub fn error(code: &str, err: impl std::fmt::Display) -> Self {
        MethodResult::Error {
            code: code.to_string(),
            message: err.to_string(),
        }
    }
}

/// Outbound call from the handler to the shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub channel: String,
    pub method: String,
    pub arguments: Value,
}

/// Named channel backed by an unbounded queue to the shell.
#[derive(Debug, Clone)]
pub struct ShareChannel {
    name: String,
    tx: mpsc::UnboundedSender<ChannelMessage>,
}

impl ShareChannel {
    pub fn new(name: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<ChannelMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::from_sender(name, tx), rx)
    }

    pub fn from_sender(name: impl Into<String>, tx: mpsc::UnboundedSender<ChannelMessage>) -> Self {
        Self {
            name: name.into(),
            tx,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke_method(&self, method: &str, arguments: Value) -> Result<()> {
        let message = ChannelMessage {
            channel: self.name.clone(),
            method: method.to_string(),
            arguments,
        };
        self.tx
            .send(message)
            .map_err(|_| ShareError::Channel(self.name.clone()))
    }
}

impl SharedSink for ShareChannel {
    fn notify(&self, method: &str, payload: &SharedPayload) {
        let arguments = match serde_json::to_value(payload) {
            Ok(v) => v,
            Err(e) => {
                debug!("Could not encode {} payload: {}", method, e);
                return;
            }
        };
        if let Err(e) = self.invoke_method(method, arguments) {
            debug!("Dropped {} push: {}", method, e);
        }
    }
}
