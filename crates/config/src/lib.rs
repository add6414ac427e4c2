//! Bridge configuration: the endpoint table (team → auth token) and the
//! sync-link table pairing internal conversations with external channels.

pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{discover_and_load, load_config},
    schema::{BridgeConfig, ChannelRef, EndpointConfig, SyncLink},
    validate::{ValidationIssue, validate},
};
