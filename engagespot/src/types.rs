use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// API credentials issued by Engagespot.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// The user-visible part of a notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Link opened when the notification is clicked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Per-notification delivery overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOverride {
    /// Restrict delivery to these channels (e.g. "email", "inApp")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<Vec<String>>,
}

/// Request body for `POST /v3/notifications`.
///
/// See: <https://documentation.engagespot.co/docs/rest-api/#tag/Notifications/paths/~1v3~1notifications/post>
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub notification: NotificationContent,
    /// Unique recipient identifiers in insertion order, serialized as a JSON array
    pub recipients: IndexSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "override", default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<NotificationOverride>,
}

impl NotificationPayload {
    /// Create a payload carrying only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            notification: NotificationContent {
                title: title.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Check that the payload can be submitted.
    pub fn validate(&self) -> Result<()> {
        if self.recipients.is_empty() {
            return Err(Error::InsufficientRecipients);
        }
        Ok(())
    }
}

/// Request body for `POST /v3/sdk/connect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    pub device_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_payload_omits_optional_fields() {
        let mut payload = NotificationPayload::new("Hi");
        payload.recipients.insert("a@x.com".to_string());

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "notification": { "title": "Hi" },
                "recipients": ["a@x.com"],
            })
        );
    }

    #[test]
    fn test_override_is_renamed() {
        let mut payload = NotificationPayload::new("Hi");
        payload.overrides = Some(NotificationOverride {
            channels: Some(vec!["email".to_string()]),
        });

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["override"], json!({ "channels": ["email"] }));
        assert!(value.get("overrides").is_none());
    }

    #[test]
    fn test_validate_requires_recipients() {
        let mut payload = NotificationPayload::new("Hi");
        assert!(matches!(payload.validate(), Err(Error::InsufficientRecipients)));

        payload.recipients.insert("user-1".to_string());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_connect_request_uses_camel_case() {
        let body = ConnectRequest {
            device_type: "web".to_string(),
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "deviceType": "web" }));
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let credentials = Credentials::new("key", "super-secret");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("key"));
        assert!(!debug.contains("super-secret"));
    }
}
