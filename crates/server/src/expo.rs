//! Expo push notifications.

use engine::{Notification, Notifier, NotifyResult};
use futures::future::BoxFuture;
use serde::Serialize;

pub const EXPO_PUSH_ENDPOINT: &str = "https://exp.host/--/api/v2/push/send";

#[derive(Debug, Serialize)]
struct PushMessage {
    to: String,
    title: String,
    body: String,
}

impl From<Notification> for PushMessage {
    fn from(notification: Notification) -> Self {
        Self {
            to: notification.address,
            title: notification.title,
            body: notification.body,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExpoNotifier {
    http: reqwest::Client,
    endpoint: String,
}

impl ExpoNotifier {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

impl Notifier for ExpoNotifier {
    fn notify(&self, notification: Notification) -> BoxFuture<'static, NotifyResult> {
        let request = self
            .http
            .post(&self.endpoint)
            .json(&PushMessage::from(notification));
        Box::pin(async move {
            request.send().await?.error_for_status()?;
            Ok(())
        })
    }
}
