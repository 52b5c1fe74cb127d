//! Control messages and their frame codec.
//!
//! A frame is `[type: varint][length: varint][payload: length bytes]`. Both
//! header fields live in the 53-bit domain; `length` is computed from the
//! fully encoded payload and a decoder that consumes any other number of
//! bytes has found a protocol violation.

pub mod announce;
pub mod namespace;
pub mod session_control;
pub mod subscribe;

use crate::codec::{write_u53, Cursor, Decode, Encode};
use crate::error::{Error, Result};

pub use announce::*;
pub use namespace::*;
pub use session_control::*;
pub use subscribe::*;

/// GOAWAY is reserved in the identifier space but has no field codec.
pub const MSG_GO_AWAY: u64 = 0x10;

/// Which side of a session sends a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Subscriber,
    Publisher,
}

// One row per message: variant = wire id, debug label, sending role.
macro_rules! control_messages {
    {$($name:ident = $id:literal, $label:literal, $role:ident;)*} => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum Message {
            $($name($name),)*
        }

        $(
            impl $name {
                pub const ID: u64 = $id;
            }

            impl From<$name> for Message {
                fn from(m: $name) -> Self {
                    Self::$name(m)
                }
            }
        )*

        impl Message {
            /// Wire type identifier.
            pub fn id(&self) -> u64 {
                match self {
                    $(Self::$name(_) => $name::ID,)*
                }
            }

            /// Human-readable label for logs.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$name(_) => $label,)*
                }
            }

            pub fn role(&self) -> Role {
                match self {
                    $(Self::$name(_) => Role::$role,)*
                }
            }

            fn encode_payload(&self, buf: &mut Vec<u8>) -> Result<()> {
                match self {
                    $(Self::$name(m) => m.encode(buf),)*
                }
            }

            fn decode_fields(id: u64, cursor: &mut Cursor<'_>) -> Result<Self> {
                match id {
                    $($name::ID => Ok(Self::$name($name::decode(cursor)?)),)*
                    MSG_GO_AWAY => Err(Error::Unsupported("go_away")),
                    _ => Err(Error::UnknownMessageType(id)),
                }
            }
        }
    };
}

control_messages! {
    Subscribe = 0x03, "subscribe", Subscriber;
    SubscribeOk = 0x04, "subscribe_ok", Publisher;
    SubscribeError = 0x05, "subscribe_error", Publisher;
    Announce = 0x06, "announce", Publisher;
    AnnounceOk = 0x07, "announce_ok", Subscriber;
    AnnounceError = 0x08, "announce_error", Subscriber;
    Unannounce = 0x09, "unannounce", Publisher;
    Unsubscribe = 0x0a, "unsubscribe", Subscriber;
    SubscribeDone = 0x0b, "subscribe_done", Publisher;
    SubscribeNamespace = 0x11, "subscribe_namespace", Subscriber;
    SubscribeNamespaceOk = 0x12, "subscribe_namespace_ok", Publisher;
    SubscribeNamespaceError = 0x13, "subscribe_namespace_error", Publisher;
    UnsubscribeNamespace = 0x14, "unsubscribe_namespace", Subscriber;
    MaxSubscribeId = 0x15, "max_subscribe_id", Publisher;
}

impl Message {
    pub fn is_subscriber(&self) -> bool {
        self.role() == Role::Subscriber
    }

    pub fn is_publisher(&self) -> bool {
        self.role() == Role::Publisher
    }
}

/// Encode `msg` as one frame, appending it to `buf`.
pub fn encode_message(msg: &Message, buf: &mut Vec<u8>) -> Result<()> {
    let mut payload = Vec::new();
    msg.encode_payload(&mut payload)?;

    write_u53(buf, msg.id())?;
    write_u53(buf, payload.len() as u64)?;
    buf.extend_from_slice(&payload);
    Ok(())
}

/// Decode one frame from the start of `buf`.
///
/// Returns the message and the number of bytes consumed. An incomplete
/// frame yields [`Error::BufferTooShort`]; the caller should buffer more
/// input and retry.
pub fn decode_message(buf: &[u8]) -> Result<(Message, usize)> {
    let mut outer = Cursor::new(buf);
    let id = outer.read_u53()?;
    let len = outer.read_len()?;
    let payload = outer.read_bytes(len)?;
    let msg = decode_payload(id, payload)?;
    Ok((msg, outer.position()))
}

/// Decode a message whose header has already been read.
///
/// `payload` is exactly the declared number of bytes; the field decoder
/// must consume all of them and nothing more.
pub fn decode_payload(id: u64, payload: &[u8]) -> Result<Message> {
    let mut cursor = Cursor::new(payload);
    let msg = match Message::decode_fields(id, &mut cursor) {
        Err(Error::BufferTooShort) => {
            return Err(Error::FrameOverrun {
                declared: payload.len(),
            })
        }
        other => other?,
    };

    if cursor.remaining() != 0 {
        return Err(Error::FrameLengthMismatch {
            declared: payload.len(),
            consumed: cursor.position(),
        });
    }
    Ok(msg)
}
