use crate::client::Engagespot;
use crate::error::Result;
use crate::http::{HttpClient, HttpResponse};
use crate::types::{NotificationOverride, NotificationPayload};

/// Builder for a single notification, bound to the client that will send it.
///
/// Created by [`Engagespot::create_notification`]. Every setter consumes and returns the
/// builder so calls can be chained; [`Notification::send`] consumes it for good.
#[derive(Debug)]
#[must_use = "a notification does nothing until it is sent"]
pub struct Notification<'a, H> {
    client: &'a Engagespot<H>,
    payload: NotificationPayload,
}

impl<'a, H: HttpClient> Notification<'a, H> {
    pub(crate) fn new(client: &'a Engagespot<H>, title: impl Into<String>) -> Self {
        Self {
            client,
            payload: NotificationPayload::new(title),
        }
    }

    pub fn set_message(mut self, message: impl Into<String>) -> Self {
        self.payload.notification.message = Some(message.into());
        self
    }

    /// Set the link opened when the notification is clicked.
    pub fn set_url(mut self, url: impl Into<String>) -> Self {
        self.payload.notification.url = Some(url.into());
        self
    }

    pub fn set_icon(mut self, icon_url: impl Into<String>) -> Self {
        self.payload.notification.icon = Some(icon_url.into());
        self
    }

    pub fn set_category(mut self, category: impl Into<String>) -> Self {
        self.payload.category = Some(category.into());
        self
    }

    /// Add a recipient, e.g. `user@example.com`. Adding the same recipient twice has no effect.
    pub fn add_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.payload.recipients.insert(recipient.into());
        self
    }

    pub fn add_recipients<I, S>(mut self, recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.payload.recipients.extend(recipients.into_iter().map(Into::into));
        self
    }

    /// Restrict delivery to the given channels, replacing any previously set.
    pub fn set_channels<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.overrides().channels = Some(channels.into_iter().map(Into::into).collect());
        self
    }

    pub fn add_channel(mut self, channel: impl Into<String>) -> Self {
        self.overrides().channels.get_or_insert_with(Vec::new).push(channel.into());
        self
    }

    fn overrides(&mut self) -> &mut NotificationOverride {
        self.payload.overrides.get_or_insert_with(NotificationOverride::default)
    }

    pub fn payload(&self) -> &NotificationPayload {
        &self.payload
    }

    /// Validate and return the accumulated payload without sending it.
    pub fn build(self) -> Result<NotificationPayload> {
        self.payload.validate()?;
        Ok(self.payload)
    }

    /// Send the prepared notification.
    ///
    /// Fails with [`crate::Error::InsufficientRecipients`] before touching the network when no
    /// recipient was added.
    pub async fn send(self) -> Result<HttpResponse> {
        let client = self.client;
        let payload = self.build()?;
        client.send_notification(&payload).await
    }
}
