use serde::{Deserialize, Serialize};

/// Display metadata for one external user, keyed by their network user id.
///
/// Populated from a full roster fetch at endpoint startup and kept current
/// by membership-change events. Unknown fields in the network's user object
/// are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    /// Avatar URL, when the network provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl UserInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_url: None,
        }
    }
}

/// The internal-platform author of an outbound message.
#[derive(Debug, Clone)]
pub struct SenderIdentity {
    /// Internal platform user id.
    pub user_id: String,
    /// Name shown to external users when the message is masqueraded.
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// How an outbound message attributes itself on the external network.
///
/// A message authored by the bridge's own bot identity is sent as the
/// connection's literal identity; anything else masquerades with the
/// original author's display name so attribution survives the hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityOverride {
    /// Send as the connection's own identity (no display-name override).
    AsSelf,
    /// Send with an explicit display name and avatar.
    Masquerade {
        username: String,
        icon_url: Option<String>,
    },
}

/// Source metadata attached to every message relayed into the internal
/// platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMeta {
    /// Display name of the external author (raw id when unresolved).
    pub source_user: String,
    pub source_user_id: String,
    pub source_channel_id: String,
    /// Human-facing title for the source channel. The external network does
    /// not hand us one, so the channel id doubles as the title.
    pub source_title: String,
}
