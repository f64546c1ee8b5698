//! OneSignal push delivery.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::NotifyError;
use crate::kind::NotificationKind;
use crate::sink::NotificationSink;

/// OneSignal create-notification endpoint.
pub const ONESIGNAL_API_URL: &str = "https://onesignal.com/api/v1/notifications";

/// OneSignal application credentials.
#[derive(Debug, Clone)]
pub struct OneSignalSettings {
    /// OneSignal app id.
    pub app_id: String,
    /// REST API key.
    pub api_key: String,
    /// Endpoint; overridable for testing against a local server.
    pub api_url: String,
}

impl OneSignalSettings {
    /// Settings for the public OneSignal endpoint.
    pub fn new(app_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            api_key: api_key.into(),
            api_url: ONESIGNAL_API_URL.to_string(),
        }
    }

    /// Override the endpoint.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct CreateNotification<'a> {
    app_id: &'a str,
    include_external_user_ids: &'a [String],
    content_available: bool,
    data: HashMap<&'a str, &'a str>,
}

/// Silent data notifications through OneSignal, addressed by external user id.
pub struct OneSignalSink {
    client: reqwest::Client,
    settings: OneSignalSettings,
}

impl OneSignalSink {
    /// Create a sink with a fresh HTTP client.
    pub fn new(settings: OneSignalSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    fn request_body<'a>(
        &'a self,
        user_ids: &'a [String],
        kind: NotificationKind,
        data: Option<&'a HashMap<String, String>>,
    ) -> CreateNotification<'a> {
        let mut payload: HashMap<&str, &str> = HashMap::new();
        if let Some(data) = data {
            for (key, value) in data {
                payload.insert(key.as_str(), value.as_str());
            }
        }
        payload.insert("type", kind.as_str());

        CreateNotification {
            app_id: &self.settings.app_id,
            include_external_user_ids: user_ids,
            content_available: true,
            data: payload,
        }
    }
}

#[async_trait]
impl NotificationSink for OneSignalSink {
    async fn notify(
        &self,
        user_ids: &[String],
        kind: NotificationKind,
        data: Option<&HashMap<String, String>>,
    ) -> Result<(), NotifyError> {
        if user_ids.is_empty() {
            return Ok(());
        }

        let body = self.request_body(user_ids, kind, data);
        let response = self
            .client
            .post(&self.settings.api_url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Basic {}", self.settings.api_key),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response.text().await.unwrap_or_default();
            log::warn!("OneSignal rejected {} notification: {} {}", kind, status, body);
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        log::debug!("Sent {} notification to {} users", kind, user_ids.len());
        Ok(())
    }
}
