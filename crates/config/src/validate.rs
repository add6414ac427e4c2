use tracing::warn;

use crate::schema::BridgeConfig;

/// A non-fatal inconsistency found in the config.
///
/// Sync links naming an unconfigured team are ignored at lookup time rather
/// than treated as errors; validation surfaces them so operators can spot
/// typos before wondering where their messages went.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("sync link {link_index} references unconfigured team {team:?}")]
    UnconfiguredTeam { link_index: usize, team: String },

    #[error("sync link {link_index} has no conversations")]
    EmptyConversations { link_index: usize },

    #[error("sync link {link_index} has no channels")]
    EmptyChannels { link_index: usize },
}

/// Check the sync table against the endpoint table. Logs each issue and
/// returns the full list; an empty list means the config is coherent.
pub fn validate(config: &BridgeConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (link_index, link) in config.syncs.iter().enumerate() {
        if link.conversations.is_empty() {
            issues.push(ValidationIssue::EmptyConversations { link_index });
        }
        if link.channels.is_empty() {
            issues.push(ValidationIssue::EmptyChannels { link_index });
        }
        for channel in &link.channels {
            if !config.endpoints.contains_key(&channel.team) {
                issues.push(ValidationIssue::UnconfiguredTeam {
                    link_index,
                    team: channel.team.clone(),
                });
            }
        }
    }

    for issue in &issues {
        warn!(%issue, "config validation issue");
    }
    issues
}
