//! Async side of the MoQ control plane.
//!
//! [`MessageStream`] carries control messages over any tokio byte stream
//! using the `moq-protocol` codec, and [`Broadcasts`] turns a session's
//! announcements into broadcasts with loaded catalogs.

pub mod broadcast;
pub mod catalog;
pub mod config;
pub mod control;
pub mod error;
pub mod queue;
pub mod session;

pub use broadcast::{Broadcast, BroadcastQueue, Broadcasts};
pub use catalog::Catalog;
pub use config::Config;
pub use control::MessageStream;
pub use error::{Error, Result};
pub use session::{Announce, Announcements, CloseStatus, Segment, Subscription};
