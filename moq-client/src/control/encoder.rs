use moq_protocol::{encode_message, Message};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::Result;

/// Writes control frames to a byte stream.
///
/// A frame is fully encoded before any byte is written, so an encode
/// failure leaves the stream untouched.
pub struct Encoder<W> {
    writer: W,
    buf: Vec<u8>,
}

impl<W: AsyncWrite + Unpin> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buf: Vec::new(),
        }
    }

    pub async fn message(&mut self, msg: &Message) -> Result<()> {
        self.buf.clear();
        encode_message(msg, &mut self.buf)?;
        self.writer.write_all(&self.buf).await?;
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}
