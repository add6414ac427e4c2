use {anyhow::Result, async_trait::async_trait, syncbridge_common::types::InboundMeta};

/// Message bus of the internal chat platform — the bridge's delivery target
/// for inbound traffic.
///
/// Shared by every endpoint task, so implementations must tolerate
/// concurrent invocation. Delivery ordering across endpoints is the
/// implementation's business, not the relay core's.
#[async_trait]
pub trait InternalSink: Send + Sync {
    /// Deliver one relayed message to an internal conversation.
    async fn deliver(&self, conversation_id: &str, text: &str, meta: &InboundMeta) -> Result<()>;
}
