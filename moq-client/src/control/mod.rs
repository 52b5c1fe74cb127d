//! Async framing of the control stream.
//!
//! [`MessageStream`] pairs a [`Decoder`] and an [`Encoder`] over the two
//! halves of a bidirectional byte stream. Sends are written in the order
//! `send` was called even when the returned futures are polled out of
//! order; a protocol violation or transport failure on receive closes the
//! stream for good.

mod decoder;
mod encoder;
mod fifo;

pub use decoder::Decoder;
pub use encoder::Encoder;

use std::future::Future;
use std::sync::OnceLock;

use moq_protocol::Message;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use fifo::Fifo;

pub struct MessageStream<R, W> {
    decoder: Mutex<Decoder<R>>,
    encoder: Mutex<Encoder<W>>,
    fifo: Fifo,
    // The error every call returns once the stream is unusable.
    terminated: OnceLock<Error>,
}

impl<R, W> MessageStream<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_config(reader, writer, &Config::default())
    }

    pub fn with_config(reader: R, writer: W, config: &Config) -> Self {
        Self {
            decoder: Mutex::new(Decoder::new(reader, config.max_message_bytes)),
            encoder: Mutex::new(Encoder::new(writer)),
            fifo: Fifo::default(),
            terminated: OnceLock::new(),
        }
    }

    /// Receive the next message.
    ///
    /// Only one receive may be outstanding at a time. Returns `Ok(None)`
    /// once the peer finishes the stream cleanly. An unsupported message
    /// is reported as [`Error::Protocol`] and the stream stays usable; a
    /// protocol violation shuts the stream down and is returned as
    /// [`Error::Terminated`], as is every later call. Transport errors
    /// also shut the stream down and are repeated by every later call.
    ///
    /// Not cancel-safe: dropping the future part way through a frame ends
    /// the stream with [`Error::Interrupted`] on the next call.
    pub async fn recv(&self) -> Result<Option<Message>> {
        self.check_open()?;

        let res = self.decoder.lock().await.message().await;
        match res {
            Ok(Some(msg)) => {
                debug!(kind = msg.name(), ?msg, "received control message");
                Ok(Some(msg))
            }
            Ok(None) => {
                debug!("control stream finished");
                Ok(None)
            }
            Err(Error::Protocol(err)) if err.is_protocol_violation() => {
                Err(self.terminate(Error::Terminated(err)).await)
            }
            Err(err @ (Error::Io(_) | Error::Interrupted)) => Err(self.terminate(err).await),
            Err(err) => Err(err),
        }
    }

    /// Queue `msg` for sending.
    ///
    /// The place in line is taken when `send` is called, not when the
    /// future is first polled, so messages reach the wire in call order.
    /// A send that fails still releases its place.
    pub fn send(&self, msg: Message) -> impl Future<Output = Result<()>> + '_ {
        let ticket = self.fifo.ticket();
        async move {
            let _turn = ticket.wait().await;
            self.check_open()?;

            debug!(kind = msg.name(), ?msg, "sending control message");
            self.encoder.lock().await.message(&msg).await
        }
    }

    /// Whether a protocol violation or transport failure has closed the
    /// stream.
    pub fn is_terminated(&self) -> bool {
        self.terminated.get().is_some()
    }

    fn check_open(&self) -> Result<()> {
        match self.terminated.get() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    // Record the failure and close our side once queued sends are done.
    async fn terminate(&self, err: Error) -> Error {
        if self.terminated.set(err.clone()).is_ok() {
            warn!(
                code = err.session_error().as_u64(),
                %err,
                "control stream terminated"
            );
            let _turn = self.fifo.ticket().wait().await;
            if let Err(err) = self.encoder.lock().await.shutdown().await {
                debug!(%err, "failed to shut down control stream");
            }
        }
        self.terminated.get().cloned().unwrap_or(err)
    }
}
