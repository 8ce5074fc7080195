//! Passthrough calls. Each issues exactly one native call (or none, when the
//! method does not apply to the current platform) and relays the result.

use serde_json::{json, Value};

use super::types::{AccountInfo, ChannelConfig, RequestPushPermissionOptions};
use super::FirebaseMessaging;
use crate::bus::NotificationPayload;
use crate::error::BridgeError;
use crate::transport::Platform;

impl FirebaseMessaging {
    /// Remove delivered notifications from the notification center.
    pub async fn clear_all_notifications(&self) -> Result<(), BridgeError> {
        self.invoke::<Value>("clearAllNotifications", Vec::new())
            .await
            .map(drop)
    }

    /// Create an Android notification channel. No-op on other platforms.
    pub async fn create_notification_channel(
        &self,
        channel: &ChannelConfig,
    ) -> Result<(), BridgeError> {
        if !self.platform_is(Platform::Android) {
            return Ok(());
        }
        let arg = encode("createNotificationChannel", channel)?;
        self.invoke::<Value>("createNotificationChannel", vec![arg])
            .await
            .map(drop)
    }

    /// Delete the instance id, revoking all tokens.
    pub async fn delete_instance_id(&self) -> Result<(), BridgeError> {
        self.invoke::<Value>("deleteInstanceId", Vec::new())
            .await
            .map(drop)
    }

    /// Current APNS token. Always empty outside iOS, and a `null` from
    /// native code before registration finishes also comes back empty.
    pub async fn get_apns_token(&self) -> Result<String, BridgeError> {
        if !self.platform_is(Platform::Ios) {
            return Ok(String::new());
        }
        let token: Option<String> = self.invoke("getAPNSToken", Vec::new()).await?;
        Ok(token.unwrap_or_default())
    }

    /// The notification whose tap launched the app, if any.
    pub async fn get_initial_push_payload(
        &self,
    ) -> Result<Option<NotificationPayload>, BridgeError> {
        self.invoke("getInitialPushPayload", Vec::new()).await
    }

    /// Current FCM registration token.
    pub async fn get_token(&self) -> Result<String, BridgeError> {
        self.invoke("getToken", Vec::new()).await
    }

    /// Push permission status.
    ///
    /// On iOS `None` means the user has not answered yet. Other platforms
    /// always produce `Some`, with the native answer reduced to a boolean.
    pub async fn has_permission(&self) -> Result<Option<bool>, BridgeError> {
        let value: Value = self.invoke("hasPermission", Vec::new()).await?;
        if self.platform_is(Platform::Ios) {
            return serde_json::from_value(value).map_err(|source| BridgeError::Decode {
                method: "hasPermission".to_string(),
                source,
            });
        }
        Ok(Some(is_truthy(&value)))
    }

    /// Ask for push permission, prompting the user if undecided. Outside iOS
    /// permission is implicit and this answers `true` without a native call.
    pub async fn request_push_permission(
        &self,
        options: Option<&RequestPushPermissionOptions>,
    ) -> Result<bool, BridgeError> {
        if !self.platform_is(Platform::Ios) {
            return Ok(true);
        }
        let ios9 = options.and_then(|options| options.ios9_support.as_ref());
        let timeout = ios9
            .and_then(|support| support.timeout)
            .unwrap_or(self.config.ios_permission_timeout_secs);
        let interval = ios9
            .and_then(|support| support.interval)
            .unwrap_or(self.config.ios_permission_interval_secs);

        self.invoke("requestPushPermission", vec![json!(timeout), json!(interval)])
            .await
    }

    pub async fn subscribe_to_topic(&self, topic: &str) -> Result<(), BridgeError> {
        self.invoke::<Value>("subscribeToTopic", vec![json!(topic)])
            .await
            .map(drop)
    }

    pub async fn unsubscribe_from_topic(&self, topic: &str) -> Result<(), BridgeError> {
        self.invoke::<Value>("unsubscribeFromTopic", vec![json!(topic)])
            .await
            .map(drop)
    }

    /// Re-initialize the native SDK against another Firebase project.
    pub async fn init_different_account(&self, account: &AccountInfo) -> Result<(), BridgeError> {
        let arg = encode("initDifferentAccount", account)?;
        self.invoke::<Value>("initDifferentAccount", vec![arg])
            .await
            .map(drop)
    }
}

fn encode<T: serde::Serialize>(method: &str, value: &T) -> Result<Value, BridgeError> {
    serde_json::to_value(value).map_err(|source| BridgeError::Encode {
        method: method.to_string(),
        source,
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0 && !n.is_nan()).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
