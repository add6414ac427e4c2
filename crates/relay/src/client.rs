use std::sync::Arc;

use {
    anyhow::Result, async_trait::async_trait, secrecy::Secret,
    syncbridge_common::types::IdentityOverride,
};

/// An outbound message bound for one external channel.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub channel: String,
    pub text: String,
    pub identity: IdentityOverride,
    /// Expand user/channel mentions on the external network.
    pub link_names: bool,
}

/// Polling failure, split by whether the endpoint can keep going.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// Retried after the usual backoff interval.
    #[error("transient poll failure: {source}")]
    Transient {
        #[source]
        source: anyhow::Error,
    },

    /// Terminates this endpoint's loop (auth revoked, connection gone for
    /// good). Other endpoints are unaffected.
    #[error("fatal poll failure: {source}")]
    Fatal {
        #[source]
        source: anyhow::Error,
    },
}

impl PollError {
    #[must_use]
    pub fn transient(source: impl Into<anyhow::Error>) -> Self {
        Self::Transient {
            source: source.into(),
        }
    }

    #[must_use]
    pub fn fatal(source: impl Into<anyhow::Error>) -> Self {
        Self::Fatal {
            source: source.into(),
        }
    }
}

/// Capability interface over one external network connection.
///
/// The relay engine owns exactly one client per endpoint task; adapters wrap
/// whatever connection, auth, and wire format the network actually speaks
/// and hand the engine raw events as JSON values.
#[async_trait]
pub trait RelayClient: Send + Sync {
    /// Establish the connection. Called once before the poll loop starts.
    async fn connect(&self) -> Result<()>;

    /// Fetch the full user roster for the team.
    async fn fetch_roster(&self) -> Result<Vec<syncbridge_common::types::UserInfo>>;

    /// Poll for the next batch of raw events. May block on network I/O;
    /// an empty batch means nothing new.
    async fn poll(&self) -> std::result::Result<Vec<serde_json::Value>, PollError>;

    /// Send a message to a channel, returning the network-assigned message
    /// id (the timestamp-id used for echo suppression).
    async fn send(&self, message: &OutboundMessage) -> Result<String>;
}

/// Builds a client for one endpoint from its configured credentials.
pub trait RelayClientFactory: Send + Sync {
    fn create(&self, team: &str, token: &Secret<String>) -> Result<Arc<dyn RelayClient>>;
}
