use syncbridge_config::schema::SyncLink;

/// One external destination for an outbound fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutboundTarget<'a> {
    pub team: &'a str,
    pub channel: &'a str,
    pub link: &'a SyncLink,
}

/// Pure lookups over the immutable sync table.
///
/// Every match is served, not just the first — a conversation or channel
/// appearing in several links fans out to all of them. No match yields an
/// empty list and the caller drops the message silently.
#[derive(Debug, Default, Clone)]
pub struct SyncRouter {
    links: Vec<SyncLink>,
}

impl SyncRouter {
    pub fn new(links: Vec<SyncLink>) -> Self {
        Self { links }
    }

    /// Every configured external destination for an internal conversation.
    pub fn outbound_targets(&self, conversation_id: &str) -> Vec<OutboundTarget<'_>> {
        self.links
            .iter()
            .filter(|link| link.conversations.iter().any(|c| c == conversation_id))
            .flat_map(|link| {
                link.channels.iter().map(move |ch| OutboundTarget {
                    team: &ch.team,
                    channel: &ch.channel,
                    link,
                })
            })
            .collect()
    }

    /// Every internal conversation mapped from an external (team, channel).
    pub fn inbound_targets(&self, team: &str, channel: &str) -> Vec<&str> {
        self.links
            .iter()
            .filter(|link| {
                link.channels
                    .iter()
                    .any(|ch| ch.team == team && ch.channel == channel)
            })
            .flat_map(|link| link.conversations.iter().map(String::as_str))
            .collect()
    }

    /// Every channel any link references for this team. Seeds the
    /// endpoint's echo-suppression sets at startup.
    pub fn channels_for_team(&self, team: &str) -> Vec<&str> {
        self.links
            .iter()
            .flat_map(|link| link.channels.iter())
            .filter(|ch| ch.team == team)
            .map(|ch| ch.channel.as_str())
            .collect()
    }
}
