/// Crate-wide result type for relay operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed relay errors.
///
/// Errors are contained at the narrowest scope possible: an unknown user
/// degrades to the raw id, a failed fan-out target is skipped, a failed
/// endpoint terminates alone. Nothing here ever halts a sibling endpoint.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A user id with no directory entry for this endpoint.
    #[error("unknown user: {user_id}")]
    UnknownUser { user_id: String },

    /// An endpoint for this team is already running.
    #[error("endpoint already started for team: {team}")]
    EndpointExists { team: String },

    /// Connecting or bulk-loading the roster failed at endpoint startup.
    #[error("endpoint startup failed for team {team}: {source}")]
    Startup {
        team: String,
        #[source]
        source: anyhow::Error,
    },

    /// A raw event missing the fields a message must carry.
    #[error("invalid event: {message}")]
    InvalidEvent { message: String },
}

impl Error {
    #[must_use]
    pub fn unknown_user(user_id: impl Into<String>) -> Self {
        Self::UnknownUser {
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn endpoint_exists(team: impl Into<String>) -> Self {
        Self::EndpointExists { team: team.into() }
    }

    #[must_use]
    pub fn startup(team: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Startup {
            team: team.into(),
            source,
        }
    }

    #[must_use]
    pub fn invalid_event(message: impl Into<String>) -> Self {
        Self::InvalidEvent {
            message: message.into(),
        }
    }
}
