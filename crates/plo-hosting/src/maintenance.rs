use plo_gameroom::ServerMessage;
use plo_gameroom::now_ms;
use serde::Serialize;
use std::sync::Arc;
use std::sync::RwLock;

/// Process-wide maintenance flag, announced to clients on connect and
/// queryable over HTTP.
#[derive(Clone, Default)]
pub struct Maintenance {
    inner: Arc<RwLock<Status>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub is_active: bool,
    pub message: String,
    pub activated_at: Option<u64>,
}

impl Maintenance {
    pub fn activate(&self, message: impl Into<String>) {
        let mut status = self.inner.write().expect("maintenance lock");
        status.is_active = true;
        status.message = message.into();
        status.activated_at = Some(now_ms());
    }
    pub fn deactivate(&self) {
        let mut status = self.inner.write().expect("maintenance lock");
        *status = Status::default();
    }
    pub fn status(&self) -> Status {
        self.inner.read().expect("maintenance lock").clone()
    }
    pub fn announcement(&self) -> ServerMessage {
        let status = self.status();
        ServerMessage::Maintenance {
            is_active: status.is_active,
            message: status.message,
            activated_at: status.activated_at,
        }
    }
}
