//! Shared types used across the syncbridge crates.

pub mod types;

pub use types::{IdentityOverride, InboundMeta, SenderIdentity, UserInfo};
