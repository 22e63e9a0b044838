//! Best-effort notification of a sealed message to an external webhook.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use shared::{domain::FormRecord, protocol::NotificationPayload};
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{info, warn};
use url::Url;

use crate::error::DispatchError;

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Fire-and-forget delivery. `dispatch` returns before anything is sent and
/// never reports the outcome to the caller.
pub trait NotificationDispatcher: Send + Sync {
    fn dispatch(&self, record: &FormRecord);
}

#[derive(Debug, Clone)]
pub struct WebhookDispatcher {
    client: Client,
    endpoint: Url,
}

impl WebhookDispatcher {
    pub fn new(endpoint: Url) -> Result<Self, DispatchError> {
        let client = Client::builder().timeout(DELIVERY_TIMEOUT).build()?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends one payload. Only the status is inspected; the body is ignored.
    pub async fn deliver(&self, payload: &NotificationPayload) -> Result<(), DispatchError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    /// Spawns delivery of `payload` on the current runtime. Failures are logged
    /// by the task itself.
    pub fn spawn_delivery(
        &self,
        payload: NotificationPayload,
    ) -> Result<JoinHandle<()>, DispatchError> {
        let runtime = Handle::try_current().map_err(|_| DispatchError::NoRuntime)?;
        let dispatcher = self.clone();
        Ok(runtime.spawn(async move {
            let host = dispatcher.endpoint.host_str().unwrap_or_default().to_string();
            match dispatcher.deliver(&payload).await {
                Ok(()) => info!(%host, "notification delivered"),
                Err(error) => {
                    warn!(%host, %error, code = ?error.code(), "notification delivery failed")
                }
            }
        }))
    }
}

impl NotificationDispatcher for WebhookDispatcher {
    fn dispatch(&self, record: &FormRecord) {
        let payload = NotificationPayload::from_record(record, Utc::now());
        if let Err(error) = self.spawn_delivery(payload) {
            warn!(%error, "notification dropped");
        }
    }
}

/// Dispatcher used when no endpoint is configured: the payload is only logged.
#[derive(Debug, Clone, Default)]
pub struct LogDispatcher;

impl NotificationDispatcher for LogDispatcher {
    fn dispatch(&self, record: &FormRecord) {
        let payload = NotificationPayload::from_record(record, Utc::now());
        match serde_json::to_string(&payload) {
            Ok(body) => info!(%body, "no notification endpoint configured; payload logged only"),
            Err(error) => warn!(%error, "failed to encode notification payload"),
        }
    }
}

#[cfg(test)]
#[path = "tests/notifier_tests.rs"]
mod tests;
