use std::collections::HashMap;

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Default suspend interval between empty polls (milliseconds).
pub const DEFAULT_POLL_BACKOFF_MS: u64 = 500;

/// Top-level bridge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// The internal platform user id of the bridge's own bot. Outbound
    /// messages authored by this id are sent as the connection's literal
    /// identity instead of masquerading.
    pub bot_user_id: Option<String>,

    /// External endpoints, keyed by team identifier.
    pub endpoints: HashMap<String, EndpointConfig>,

    /// Configured pairings between conversations and channels.
    pub syncs: Vec<SyncLink>,
}

/// One authenticated connection to an external team/workspace.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Auth token for the external network.
    #[serde(serialize_with = "serialize_secret")]
    pub token: Secret<String>,

    /// Suspend interval between empty polls (ms).
    pub poll_backoff_ms: u64,
}

impl std::fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("token", &"[REDACTED]")
            .field("poll_backoff_ms", &self.poll_backoff_ms)
            .finish()
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            token: Secret::new(String::new()),
            poll_backoff_ms: DEFAULT_POLL_BACKOFF_MS,
        }
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// A configured N:M pairing between internal conversations and external
/// channels. Immutable after load; a conversation or channel may appear in
/// any number of links (fan-out).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncLink {
    /// Internal conversation ids on one side of the pairing.
    pub conversations: Vec<String>,
    /// External (team, channel) pairs on the other side.
    pub channels: Vec<ChannelRef>,
}

/// One external channel, qualified by its team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRef {
    pub team: String,
    pub channel: String,
}

impl ChannelRef {
    pub fn new(team: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            channel: channel.into(),
        }
    }
}
