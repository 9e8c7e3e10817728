//! Engagespot API client.
//!
//! The client owns the credentials, the [`ClientOptions`] and an [`HttpClient`] transport. Every
//! call is independent: one outgoing request, one response, no retries.

use bon::Builder;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::notification::Notification;
use crate::signing;
use crate::types::{ConnectRequest, Credentials, NotificationPayload};

/// Production API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.engagespot.co/v3/";

/// Device type reported by [`Engagespot::connect`] unless configured otherwise.
pub const DEFAULT_DEVICE_TYPE: &str = "web";

// https://documentation.engagespot.co/docs/rest-api/#section/Authentication
pub const API_KEY_HEADER: &str = "x-engagespot-api-key";
pub const API_SECRET_HEADER: &str = "x-engagespot-api-secret";
pub const USER_ID_HEADER: &str = "x-engagespot-user-id";
pub const DEVICE_ID_HEADER: &str = "x-engagespot-device-id";
pub const USER_SIGNATURE_HEADER: &str = "x-engagespot-user-signature";

const NOTIFICATIONS_PATH: &str = "notifications";
const CONNECT_PATH: &str = "sdk/connect";

/// Optional client behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ClientOptions {
    /// Attach `X-ENGAGESPOT-USER-SIGNATURE` to connect calls
    #[builder(default)]
    pub enable_hmac: bool,
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    #[builder(into, default = DEFAULT_DEVICE_TYPE.to_string())]
    pub device_type: String,
    /// Stable device identifier; a random one is generated per client when unset
    #[builder(into)]
    pub device_id: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Entry point to the Engagespot API.
#[derive(Debug, Clone)]
pub struct Engagespot<H = ReqwestHttpClient> {
    credentials: Credentials,
    options: ClientOptions,
    device_id: String,
    http: H,
}

impl Engagespot<ReqwestHttpClient> {
    /// Create a client with default options.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self::with_options(Credentials::new(api_key, api_secret), ClientOptions::default())
    }

    pub fn with_options(credentials: Credentials, options: ClientOptions) -> Self {
        Self::with_http_client(credentials, options, ReqwestHttpClient::new())
    }
}

impl<H: HttpClient> Engagespot<H> {
    /// Create a client on top of a custom transport.
    pub fn with_http_client(credentials: Credentials, mut options: ClientOptions, http: H) -> Self {
        if !options.base_url.ends_with('/') {
            options.base_url.push('/');
        }
        let device_id = options.device_id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            credentials,
            options,
            device_id,
            http,
        }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Device id sent with connect calls.
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Start building a notification with the given title.
    ///
    /// ```ignore
    /// client
    ///     .create_notification("Hi")
    ///     .set_message("hello")
    ///     .add_recipient("a@x.com")
    ///     .send()
    ///     .await?;
    /// ```
    pub fn create_notification(&self, title: impl Into<String>) -> Notification<'_, H> {
        Notification::new(self, title)
    }

    /// Send an already prepared notification.
    ///
    /// The payload is posted as-is; use [`Notification::send`] for recipient validation.
    // https://documentation.engagespot.co/docs/rest-api/#tag/Notifications/paths/~1v3~1notifications/post
    #[instrument(skip(self, payload), fields(recipients = payload.recipients.len()))]
    pub async fn send_notification(&self, payload: &NotificationPayload) -> Result<HttpResponse> {
        self.post(NOTIFICATIONS_PATH, payload, self.base_headers()?).await
    }

    /// Register a user session with Engagespot.
    ///
    /// Sends the user and device ids, plus the HMAC user signature when
    /// [`ClientOptions::enable_hmac`] is set.
    #[instrument(skip(self, user_id), fields(hmac = self.options.enable_hmac))]
    pub async fn connect(&self, user_id: &str) -> Result<HttpResponse> {
        let mut extra = HeaderMap::new();
        extra.insert(HeaderName::from_static(USER_ID_HEADER), header_value(USER_ID_HEADER, user_id)?);
        extra.insert(HeaderName::from_static(DEVICE_ID_HEADER), header_value(DEVICE_ID_HEADER, &self.device_id)?);
        if self.options.enable_hmac {
            let signature = self.gen_hmac(user_id);
            extra.insert(HeaderName::from_static(USER_SIGNATURE_HEADER), header_value(USER_SIGNATURE_HEADER, &signature)?);
        }

        let body = ConnectRequest {
            device_type: self.options.device_type.clone(),
        };

        self.post(CONNECT_PATH, &body, self.headers_with(extra)?).await
    }

    /// Base64 HMAC-SHA256 of `user_id`, keyed by the API secret.
    ///
    /// Read more at <https://documentation.engagespot.co/docs/HMAC-authentication/enabling-HMAC-authentication>
    pub fn gen_hmac(&self, user_id: &str) -> String {
        signing::sign_user_id(self.credentials.api_secret(), user_id)
    }

    fn base_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            header_value(API_KEY_HEADER, self.credentials.api_key())?,
        );
        let mut secret = header_value(API_SECRET_HEADER, self.credentials.api_secret())?;
        secret.set_sensitive(true);
        headers.insert(HeaderName::from_static(API_SECRET_HEADER), secret);
        Ok(headers)
    }

    /// Base headers with `extra` merged on top. Same-name extras replace base values.
    fn headers_with(&self, extra: HeaderMap) -> Result<HeaderMap> {
        let mut headers = self.base_headers()?;
        headers.extend(extra);
        Ok(headers)
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B, headers: HeaderMap) -> Result<HttpResponse> {
        let request = HttpRequest {
            method: "POST".to_string(),
            endpoint: self.options.base_url.clone(),
            path: path.to_string(),
            headers,
            body: serde_json::to_string(body)?,
        };

        debug!(path = %path, "Calling Engagespot API");
        let response = self.http.execute(&request).await?;

        match response.status {
            401 => {
                warn!(path = %path, "Engagespot rejected the API credentials");
                Err(Error::AuthFail)
            }
            _ if response.is_success() => Ok(response),
            status => {
                debug!(path = %path, status = status, "Engagespot API returned an error status");
                Err(Error::Status {
                    status,
                    body: response.body,
                })
            }
        }
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| Error::InvalidHeader { name: name.to_string() })
}
