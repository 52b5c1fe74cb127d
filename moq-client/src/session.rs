//! Seams between broadcast discovery and the session that carries it.
//!
//! The transport session (announce handling, SUBSCRIBE bookkeeping, object
//! delivery) lives outside this crate; discovery only needs the handful of
//! operations below.

use async_trait::async_trait;
use bytes::Bytes;
use moq_protocol::TrackNamespace;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::Result;

/// Stream of namespaces announced by the peer.
#[async_trait]
pub trait Announcements: Send + 'static {
    type Announce: Announce;

    /// The next announcement, or `Ok(None)` once the peer will send no more.
    async fn next(&mut self) -> Result<Option<Self::Announce>>;
}

/// One announced namespace, able to open subscriptions on its tracks.
#[async_trait]
pub trait Announce: Send + Sync + 'static {
    type Subscription: Subscription;

    fn namespace(&self) -> &TrackNamespace;

    async fn subscribe(&self, track: &str) -> Result<Self::Subscription>;
}

/// An open track subscription.
///
/// Closing a subscription must end any read still in flight on it.
#[async_trait]
pub trait Subscription: Send + 'static {
    /// The next segment, or `Ok(None)` if the track ended without one.
    async fn data(&mut self) -> Result<Option<Segment>>;

    /// Close the subscription. `None` is a normal close; `Some` carries the
    /// error reported to the publisher.
    async fn close(&mut self, status: Option<CloseStatus>) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseStatus {
    pub code: u64,
    pub reason: String,
}

/// A readable group of a track, tagged with its sequence number.
pub struct Segment {
    pub sequence: u64,
    stream: Box<dyn AsyncRead + Send + Unpin>,
}

impl Segment {
    pub fn new(sequence: u64, stream: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self {
            sequence,
            stream: Box::new(stream),
        }
    }

    /// Read the segment to its end.
    pub async fn read_all(&mut self) -> Result<Bytes> {
        let mut buf = Vec::new();
        self.stream.read_to_end(&mut buf).await?;
        Ok(Bytes::from(buf))
    }
}

impl std::fmt::Debug for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Segment")
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn segment_reads_to_end() {
        let mut segment = Segment::new(0, &b"{\"tracks\":[]}"[..]);
        assert_eq!(segment.sequence, 0);
        assert_eq!(&segment.read_all().await.unwrap()[..], b"{\"tracks\":[]}");
        assert!(segment.read_all().await.unwrap().is_empty());
    }
}
