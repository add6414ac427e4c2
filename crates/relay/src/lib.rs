//! Relay core for the syncbridge chat bridge.
//!
//! One polling loop runs per configured external endpoint; inbound events
//! are normalized, routed through the sync table, checked against the
//! echo-suppression cache, and forwarded to the internal sink. Outbound
//! messages fan out to every mapped external channel with the original
//! author's identity. Concrete network clients and the internal message bus
//! implement the capability traits in [`client`] and [`sink`].

pub mod client;
pub mod directory;
pub mod echo;
pub mod engine;
pub mod error;
pub mod event;
pub mod router;
pub mod sink;

pub use {
    client::{OutboundMessage, PollError, RelayClient, RelayClientFactory},
    directory::UserDirectory,
    echo::EchoCache,
    engine::RelayBridge,
    error::{Error, Result},
    event::NormalizedMessage,
    router::{OutboundTarget, SyncRouter},
    sink::InternalSink,
};
