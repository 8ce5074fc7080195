use serde::{Deserialize, Serialize};

/// Android notification channel definition (Android 8.0+).
///
/// Once created, a channel is fixed until the app is uninstalled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Referenced by the `android_channel_id` push payload key.
    pub id: String,
    /// Name shown to the user.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    /// Raw resource name, located at `resources/raw/<sound>.mp3`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lights: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibration: Option<bool>,
}

impl ChannelConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            importance: None,
            visibility: None,
            sound: None,
            lights: None,
            vibration: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    None,
    Min,
    Low,
    Default,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    Secret,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPushPermissionOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ios9_support: Option<Ios9Support>,
}

/// Polling parameters for iOS 9, which has no permission callback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ios9Support {
    /// Seconds to wait for a decision before answering `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,
    /// Seconds between permission checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<f64>,
}

/// Firebase project credentials for `init_different_account`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub project_number: String,
    pub database_url: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub app_id: String,
    pub api_key: String,
    pub package_name: String,
    pub client_id: String,
}
