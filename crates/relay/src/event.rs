use serde_json::Value;

use crate::error::{Error, Result};

/// A message event flattened into the fields the relay cares about.
///
/// Edit events (`subtype == "message_changed"`) nest the real payload one
/// level deeper than an original post; both shapes normalize to the same
/// struct. File-comment events nest their author and text under `comment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedMessage {
    /// Timestamp-id: dedup key and ordering token within a channel.
    pub ts: String,
    pub channel: String,
    pub user: Option<String>,
    pub text: String,
    pub edited: bool,
}

impl NormalizedMessage {
    /// Normalize a raw `message` event. Events missing a timestamp or a
    /// channel are rejected; the poll loop logs and skips them.
    pub fn from_event(event: &Value) -> Result<Self> {
        let ts = str_field(event, "ts").ok_or_else(|| Error::invalid_event("missing ts"))?;

        // Group messages carry the channel under "group".
        let channel = str_field(event, "channel")
            .or_else(|| str_field(event, "group"))
            .ok_or_else(|| Error::invalid_event("missing channel"))?;

        let edited = str_field(event, "subtype").as_deref() == Some("message_changed");
        let payload = if edited {
            event
                .get("message")
                .ok_or_else(|| Error::invalid_event("edit event missing nested message"))?
        } else {
            event
        };

        let comment = payload.get("comment");
        let user = str_field(payload, "user")
            .or_else(|| comment.and_then(|c| str_field(c, "user")));
        let text = str_field(payload, "text")
            .or_else(|| comment.and_then(|c| str_field(c, "text")))
            .unwrap_or_default();

        Ok(Self {
            ts,
            channel,
            user,
            text,
            edited,
        })
    }
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}
