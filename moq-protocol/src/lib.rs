//! Sans-IO codec for the MoQ transport control stream.
//!
//! Nothing here performs I/O: messages are encoded into `Vec<u8>` frames and
//! decoded from byte slices, so the same code serves blocking, async and
//! test harnesses alike.

pub mod codec;
pub mod error;
pub mod message;
pub mod params;
pub mod types;
pub mod varint;

pub use codec::{Cursor, Decode, Encode};
pub use error::{Error, Result, SessionError, SubscribeDoneStatus, SubscribeErrorCode};
pub use message::{decode_message, decode_payload, encode_message, Message, Role};
pub use params::Parameters;
pub use types::{GroupOrder, Location, Position, TrackNamespace};
