use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("buffer too short")]
    BufferTooShort,

    #[error("varint exceeds maximum value (2^62 - 1)")]
    VarintOverflow,

    #[error("value {0} exceeds the 53-bit numeric domain")]
    IntegerOverflow(u64),

    #[error("message length {len} exceeds maximum {max}")]
    MessageTooLong { len: u64, max: usize },

    #[error("unknown message type: {0:#x}")]
    UnknownMessageType(u64),

    #[error("unsupported message: {0}")]
    Unsupported(&'static str),

    #[error("message length mismatch: declared {declared}, consumed {consumed}")]
    FrameLengthMismatch { declared: usize, consumed: usize },

    #[error("message length mismatch: declared {declared}, payload needs more")]
    FrameOverrun { declared: usize },

    #[error("invalid group order: {0}")]
    InvalidGroupOrder(u8),

    #[error("invalid location mode: {0:#x}")]
    InvalidLocationMode(u64),

    #[error("duplicate parameter id: {0:#x}")]
    DuplicateParameter(u64),

    #[error("invalid presence flag: {0}")]
    InvalidPresenceFlag(u8),

    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid track namespace: {0}")]
    InvalidTrackNamespace(String),
}

impl Error {
    /// Whether the peer broke the framing or field rules. The receiver must
    /// close the session when this is true; the stream can no longer be
    /// trusted to be aligned on a frame boundary.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            Self::IntegerOverflow(_)
                | Self::MessageTooLong { .. }
                | Self::UnknownMessageType(_)
                | Self::FrameLengthMismatch { .. }
                | Self::FrameOverrun { .. }
                | Self::InvalidGroupOrder(_)
                | Self::InvalidLocationMode(_)
                | Self::DuplicateParameter(_)
                | Self::InvalidPresenceFlag(_)
                | Self::InvalidUtf8
                | Self::InvalidTrackNamespace(_)
        )
    }

    /// Termination code to report when this error closes the session.
    pub fn session_error(&self) -> SessionError {
        if self.is_protocol_violation() {
            SessionError::ProtocolViolation
        } else {
            SessionError::InternalError
        }
    }
}

/// Session termination codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum SessionError {
    NoError = 0x0,
    InternalError = 0x1,
    Unauthorized = 0x2,
    ProtocolViolation = 0x3,
    DuplicateTrackAlias = 0x4,
    ParameterLengthMismatch = 0x5,
    GoawayTimeout = 0x10,
}

impl SessionError {
    pub fn as_u64(self) -> u64 {
        self as u64
    }

    pub fn from_u64(v: u64) -> Option<Self> {
        match v {
            0x0 => Some(Self::NoError),
            0x1 => Some(Self::InternalError),
            0x2 => Some(Self::Unauthorized),
            0x3 => Some(Self::ProtocolViolation),
            0x4 => Some(Self::DuplicateTrackAlias),
            0x5 => Some(Self::ParameterLengthMismatch),
            0x10 => Some(Self::GoawayTimeout),
            _ => None,
        }
    }
}

/// Codes carried by SUBSCRIBE_ERROR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum SubscribeErrorCode {
    InternalError = 0x0,
    InvalidRange = 0x1,
    RetryTrackAlias = 0x2,
}

impl SubscribeErrorCode {
    pub fn as_u64(self) -> u64 {
        self as u64
    }

    pub fn from_u64(v: u64) -> Option<Self> {
        match v {
            0x0 => Some(Self::InternalError),
            0x1 => Some(Self::InvalidRange),
            0x2 => Some(Self::RetryTrackAlias),
            _ => None,
        }
    }
}

/// Status codes carried by SUBSCRIBE_DONE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum SubscribeDoneStatus {
    Unsubscribed = 0x0,
    InternalError = 0x1,
    Unauthorized = 0x2,
    TrackEnded = 0x3,
    SubscriptionEnded = 0x4,
    GoingAway = 0x5,
    Expired = 0x6,
}

impl SubscribeDoneStatus {
    pub fn as_u64(self) -> u64 {
        self as u64
    }

    pub fn from_u64(v: u64) -> Option<Self> {
        match v {
            0x0 => Some(Self::Unsubscribed),
            0x1 => Some(Self::InternalError),
            0x2 => Some(Self::Unauthorized),
            0x3 => Some(Self::TrackEnded),
            0x4 => Some(Self::SubscriptionEnded),
            0x5 => Some(Self::GoingAway),
            0x6 => Some(Self::Expired),
            _ => None,
        }
    }
}
