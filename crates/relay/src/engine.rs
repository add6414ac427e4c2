use std::{
    collections::HashMap,
    sync::{Arc, Mutex, RwLock},
    time::Duration,
};

use {
    tokio_util::sync::CancellationToken,
    tracing::{debug, error, info, warn},
};

use {
    syncbridge_common::types::{IdentityOverride, InboundMeta, SenderIdentity, UserInfo},
    syncbridge_config::schema::{BridgeConfig, EndpointConfig},
};

use crate::{
    client::{OutboundMessage, PollError, RelayClient, RelayClientFactory},
    directory::UserDirectory,
    echo::EchoCache,
    error::{Error, Result},
    event::NormalizedMessage,
    router::SyncRouter,
    sink::InternalSink,
};

/// Running endpoints, keyed by team identifier.
pub type EndpointStateMap = Arc<RwLock<HashMap<String, Arc<EndpointState>>>>;

/// Runtime state of one endpoint, owned by its poll-loop task and reached
/// from outbound dispatch through the state map.
pub struct EndpointState {
    pub team: String,
    pub client: Arc<dyn RelayClient>,
    /// std::sync::Mutex: all directory operations are synchronous map
    /// lookups, never held across `.await` points.
    pub directory: Mutex<UserDirectory>,
    pub echo: Mutex<EchoCache>,
    pub poll_backoff: Duration,
    pub cancel: CancellationToken,
}

/// The relay engine: one poll loop per endpoint plus the outbound fan-out.
pub struct RelayBridge {
    endpoints: EndpointStateMap,
    router: Arc<SyncRouter>,
    sink: Arc<dyn InternalSink>,
    /// Internal platform id of the bridge's own bot. Messages it authors
    /// are sent as the connection's literal identity.
    bot_user_id: Option<String>,
}

impl RelayBridge {
    pub fn new(router: SyncRouter, sink: Arc<dyn InternalSink>) -> Self {
        Self {
            endpoints: Arc::new(RwLock::new(HashMap::new())),
            router: Arc::new(router),
            sink,
            bot_user_id: None,
        }
    }

    pub fn with_bot_user_id(mut self, bot_user_id: impl Into<String>) -> Self {
        self.bot_user_id = Some(bot_user_id.into());
        self
    }

    /// Start every configured endpoint. A failed start is logged and does
    /// not keep sibling endpoints from coming up.
    pub async fn start(&self, config: &BridgeConfig, factory: &dyn RelayClientFactory) {
        for (team, endpoint) in &config.endpoints {
            if let Err(e) = self.start_endpoint(team, endpoint, factory).await {
                error!(team = %team, error = %e, "failed to start endpoint");
            }
        }
    }

    /// Connect one endpoint, load its roster, seed its echo sets, and spawn
    /// its poll loop.
    pub async fn start_endpoint(
        &self,
        team: &str,
        config: &EndpointConfig,
        factory: &dyn RelayClientFactory,
    ) -> Result<()> {
        if self.is_running(team) {
            return Err(Error::endpoint_exists(team));
        }

        info!(team = %team, "starting endpoint");
        let client = factory
            .create(team, &config.token)
            .map_err(|e| Error::startup(team, e))?;
        client.connect().await.map_err(|e| Error::startup(team, e))?;

        let roster = client
            .fetch_roster()
            .await
            .map_err(|e| Error::startup(team, e))?;
        let mut directory = UserDirectory::new();
        directory.bulk_load(roster);
        info!(team = %team, users = directory.len(), "roster loaded");

        let state = Arc::new(EndpointState {
            team: team.to_owned(),
            client,
            directory: Mutex::new(directory),
            echo: Mutex::new(EchoCache::with_channels(
                self.router.channels_for_team(team),
            )),
            poll_backoff: Duration::from_millis(config.poll_backoff_ms),
            cancel: CancellationToken::new(),
        });

        {
            let mut map = self.endpoints.write().unwrap_or_else(|e| e.into_inner());
            if map.contains_key(team) {
                return Err(Error::endpoint_exists(team));
            }
            map.insert(team.to_owned(), Arc::clone(&state));
        }

        let endpoints = Arc::clone(&self.endpoints);
        let router = Arc::clone(&self.router);
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            run_poll_loop(&state, &router, sink.as_ref()).await;
            // Loop isolation: only this endpoint goes away.
            let mut map = endpoints.write().unwrap_or_else(|e| e.into_inner());
            map.remove(&state.team);
            info!(team = %state.team, "endpoint terminated");
        });

        Ok(())
    }

    /// Cancel an endpoint's poll loop. The task removes itself from the
    /// state map on exit.
    pub fn stop_endpoint(&self, team: &str) {
        let state = {
            let map = self.endpoints.read().unwrap_or_else(|e| e.into_inner());
            map.get(team).cloned()
        };
        match state {
            Some(state) => {
                info!(team = %team, "stopping endpoint");
                state.cancel.cancel();
            },
            None => warn!(team = %team, "endpoint not running"),
        }
    }

    /// Teams with a running endpoint.
    pub fn endpoint_teams(&self) -> Vec<String> {
        let map = self.endpoints.read().unwrap_or_else(|e| e.into_inner());
        map.keys().cloned().collect()
    }

    pub fn is_running(&self, team: &str) -> bool {
        let map = self.endpoints.read().unwrap_or_else(|e| e.into_inner());
        map.contains_key(team)
    }

    /// Runtime state for one endpoint, if running.
    pub fn endpoint_state(&self, team: &str) -> Option<Arc<EndpointState>> {
        let map = self.endpoints.read().unwrap_or_else(|e| e.into_inner());
        map.get(team).cloned()
    }

    /// Relay an internal message outward to every mapped external channel.
    ///
    /// Targets are attempted independently: one failed send is logged and
    /// skipped, siblings still go out. Targets whose team has no running
    /// endpoint are dropped silently (a sync link may outlive its endpoint
    /// config).
    pub async fn dispatch(&self, conversation_id: &str, text: &str, sender: &SenderIdentity) {
        for target in self.router.outbound_targets(conversation_id) {
            let Some(state) = self.endpoint_state(target.team) else {
                debug!(
                    team = target.team,
                    channel = target.channel,
                    "no endpoint for fan-out target, skipping"
                );
                continue;
            };

            let message = OutboundMessage {
                channel: target.channel.to_owned(),
                text: text.to_owned(),
                identity: self.resolve_identity(sender),
                link_names: true,
            };
            match state.client.send(&message).await {
                Ok(ts) => {
                    debug!(
                        team = target.team,
                        channel = target.channel,
                        ts = %ts,
                        "outbound message sent"
                    );
                    let mut echo = state.echo.lock().unwrap_or_else(|e| e.into_inner());
                    echo.mark_sent(target.channel, ts);
                },
                Err(e) => {
                    warn!(
                        team = target.team,
                        channel = target.channel,
                        error = %e,
                        "send failed, skipping fan-out target"
                    );
                },
            }
        }
    }

    /// A message authored by the bridge's own bot goes out as the
    /// connection's literal identity; anyone else is masqueraded so the
    /// original author stays visible downstream.
    fn resolve_identity(&self, sender: &SenderIdentity) -> IdentityOverride {
        if self.bot_user_id.as_deref() == Some(sender.user_id.as_str()) {
            IdentityOverride::AsSelf
        } else {
            IdentityOverride::Masquerade {
                username: sender.display_name.clone(),
                icon_url: sender.avatar_url.clone(),
            }
        }
    }
}

async fn run_poll_loop(state: &EndpointState, router: &SyncRouter, sink: &dyn InternalSink) {
    info!(team = %state.team, "poll loop started");
    loop {
        let batch = tokio::select! {
            _ = state.cancel.cancelled() => {
                info!(team = %state.team, "poll loop cancelled");
                break;
            }
            batch = state.client.poll() => batch,
        };

        match batch {
            Ok(events) => {
                if events.is_empty() {
                    // Cooperative yield, not a busy loop.
                    if backoff(state).await {
                        break;
                    }
                    continue;
                }
                // Strict poll-batch order within this endpoint.
                for event in &events {
                    handle_event(state, router, sink, event).await;
                }
            },
            Err(PollError::Transient { source }) => {
                warn!(team = %state.team, error = %source, "transient poll failure, backing off");
                if backoff(state).await {
                    break;
                }
            },
            Err(PollError::Fatal { source }) => {
                error!(team = %state.team, error = %source, "fatal poll failure, terminating endpoint");
                break;
            },
        }
    }
}

/// Sleep one backoff interval. Returns true when cancelled mid-sleep.
async fn backoff(state: &EndpointState) -> bool {
    tokio::select! {
        _ = state.cancel.cancelled() => true,
        _ = tokio::time::sleep(state.poll_backoff) => false,
    }
}

async fn handle_event(
    state: &EndpointState,
    router: &SyncRouter,
    sink: &dyn InternalSink,
    event: &serde_json::Value,
) {
    let kind = event
        .get("type")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    match kind {
        "message" => match NormalizedMessage::from_event(event) {
            Ok(msg) => relay_inbound(state, router, sink, &msg).await,
            Err(e) => {
                warn!(team = %state.team, error = %e, "skipping malformed message event");
            },
        },
        // Membership changes refresh the directory; nothing is relayed.
        "team_join" | "user_change" => upsert_member(state, event),
        other => debug!(team = %state.team, kind = other, "ignoring event kind"),
    }
}

fn upsert_member(state: &EndpointState, event: &serde_json::Value) {
    let Some(payload) = event.get("user") else {
        warn!(team = %state.team, "membership event without user payload");
        return;
    };
    match serde_json::from_value::<UserInfo>(payload.clone()) {
        Ok(user) => {
            debug!(team = %state.team, user_id = %user.id, "directory upsert");
            let mut directory = state.directory.lock().unwrap_or_else(|e| e.into_inner());
            directory.upsert(user);
        },
        Err(e) => warn!(team = %state.team, error = %e, "unparseable membership event"),
    }
}

async fn relay_inbound(
    state: &EndpointState,
    router: &SyncRouter,
    sink: &dyn InternalSink,
    msg: &NormalizedMessage,
) {
    let conversations = router.inbound_targets(&state.team, &msg.channel);
    if conversations.is_empty() {
        // Unmapped channel: not bridged, not an error.
        return;
    }

    // Checked once per event, before fan-out: a match consumes the entry
    // and swallows the event for every mapped conversation.
    let suppressed = {
        let mut echo = state.echo.lock().unwrap_or_else(|e| e.into_inner());
        echo.should_suppress(&msg.channel, &msg.ts)
    };
    if suppressed {
        debug!(team = %state.team, channel = %msg.channel, ts = %msg.ts, "suppressed self echo");
        return;
    }

    let source_user_id = msg.user.clone().unwrap_or_else(|| "unknown".into());
    let source_user = {
        let directory = state.directory.lock().unwrap_or_else(|e| e.into_inner());
        directory.display_name(&source_user_id)
    };
    let meta = InboundMeta {
        source_user,
        source_user_id,
        source_channel_id: msg.channel.clone(),
        source_title: msg.channel.clone(),
    };

    for conversation_id in conversations {
        if let Err(e) = sink.deliver(conversation_id, &msg.text, &meta).await {
            warn!(
                team = %state.team,
                conversation_id,
                error = %e,
                "internal delivery failed"
            );
        }
    }
}
