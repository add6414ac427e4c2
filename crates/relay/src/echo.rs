use std::collections::{HashMap, HashSet};

/// Per-channel sets of message ids the bridge just sent outward and has not
/// yet seen echoed back by its own poll loop.
///
/// Entries are single-use: the first matching inbound event consumes the
/// entry, and the consumption itself is the suppression. A later event
/// reusing the same id is genuine traffic and relays normally. Each id is
/// unique per send, so unmatched entries are never reclaimed (no TTL).
#[derive(Debug, Default)]
pub struct EchoCache {
    sent: HashMap<String, HashSet<String>>,
}

impl EchoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed an empty set for every channel the sync table references,
    /// mirroring the endpoint's configured reach.
    pub fn with_channels<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sent: channels
                .into_iter()
                .map(|c| (c.into(), HashSet::new()))
                .collect(),
        }
    }

    /// Record a message id right after a successful outbound send.
    pub fn mark_sent(&mut self, channel: &str, message_id: impl Into<String>) {
        self.sent
            .entry(channel.to_owned())
            .or_default()
            .insert(message_id.into());
    }

    /// Whether an inbound message is the echo of our own send. A match
    /// consumes the entry, so the answer is `true` exactly once per id.
    pub fn should_suppress(&mut self, channel: &str, message_id: &str) -> bool {
        self.sent
            .get_mut(channel)
            .is_some_and(|ids| ids.remove(message_id))
    }

    /// Non-consuming membership check.
    pub fn contains(&self, channel: &str, message_id: &str) -> bool {
        self.sent
            .get(channel)
            .is_some_and(|ids| ids.contains(message_id))
    }
}
