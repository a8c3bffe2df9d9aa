//! Single-endpoint request router for the Courier messenger.
//!
//! An [`Invocation`](courier_types::invocation::Invocation) names an action;
//! the router resolves it to one handler, runs that handler's SQL against a
//! freshly opened [`Store`](courier_db::Store) and shapes the rows into JSON.

pub mod chats;
pub mod cors;
pub mod error;
pub mod invites;
pub mod messages;
pub mod moderation;
pub mod params;
pub mod presentation;
pub mod relative_time;
pub mod router;
pub mod users;

pub use error::ApiError;
pub use router::{Reply, Router, RouterConfig};
