use std::collections::HashMap;

use syncbridge_common::types::UserInfo;

use crate::error::{Error, Result};

/// Per-endpoint cache of external user id → display metadata.
///
/// Seeded from a full roster fetch at endpoint startup and kept current by
/// membership-change events. Entries are never evicted; for a long-lived
/// team this grows with the roster, which is fine for a display-name cache.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: HashMap<String, UserInfo>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache contents with a full roster snapshot.
    pub fn bulk_load(&mut self, roster: impl IntoIterator<Item = UserInfo>) {
        self.users = roster.into_iter().map(|u| (u.id.clone(), u)).collect();
    }

    /// Insert or update a single entry from a membership-change event.
    pub fn upsert(&mut self, user: UserInfo) {
        self.users.insert(user.id.clone(), user);
    }

    /// Look up a user. Callers relaying a message fall back to the raw id
    /// instead of propagating this error.
    pub fn resolve(&self, user_id: &str) -> Result<&UserInfo> {
        self.users
            .get(user_id)
            .ok_or_else(|| Error::unknown_user(user_id))
    }

    /// Best-effort display name: the cached name, or the raw id.
    pub fn display_name(&self, user_id: &str) -> String {
        self.resolve(user_id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|_| user_id.to_owned())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
