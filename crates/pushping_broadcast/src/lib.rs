//! Periodic broadcast for pushping
//!
//! Every tick reads all registered tokens from a [`pushping_common::TokenStore`]
//! and sends one ping per token through a [`pushping_common::PushGateway`].

pub mod dispatch;
pub mod scheduler;

pub use dispatch::{dispatch_all, Delivery, TickReport};
pub use scheduler::{BroadcastHandle, Broadcaster, TickOutcome};
