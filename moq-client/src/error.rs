use std::sync::Arc;

use moq_protocol::SessionError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the control stream and broadcast discovery.
///
/// Cloneable so one failure can be handed to every waiter on an aborted
/// queue; non-cloneable sources are held behind `Arc`.
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("io error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("protocol error: {0}")]
    Protocol(#[from] moq_protocol::Error),

    /// The control stream hit a protocol violation earlier and is closed.
    #[error("session terminated: {0}")]
    Terminated(moq_protocol::Error),

    /// A receive was dropped part way through a frame, so the stream is no
    /// longer aligned on a frame boundary.
    #[error("control stream receive interrupted mid-frame")]
    Interrupted,

    /// Discovery was dropped before the catalog fetch finished.
    #[error("discovery stopped")]
    Cancelled,

    #[error("subscribe failed ({code}): {reason}")]
    Subscribe { code: u64, reason: String },

    #[error("no catalog data")]
    NoCatalogData,

    #[error("catalog delta updates are not supported (sequence {0})")]
    CatalogDelta(u64),

    #[error("catalog decode failed: {0}")]
    CatalogDecode(Arc<serde_json::Error>),

    #[error("invalid catalog: {0}")]
    InvalidCatalog(&'static str),

    #[error("session closed: {0}")]
    Session(String),
}

impl Error {
    /// The codec error that ended the session, if any.
    pub fn protocol_violation(&self) -> Option<&moq_protocol::Error> {
        match self {
            Self::Terminated(err) => Some(err),
            Self::Protocol(err) if err.is_protocol_violation() => Some(err),
            _ => None,
        }
    }

    /// Termination code to report when this error ends the session.
    pub fn session_error(&self) -> SessionError {
        match self.protocol_violation() {
            Some(err) => err.session_error(),
            None => SessionError::InternalError,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::CatalogDecode(Arc::new(err))
    }
}
