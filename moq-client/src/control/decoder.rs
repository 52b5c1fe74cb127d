use moq_protocol::varint::varint_len_from_first;
use moq_protocol::{decode_payload, Cursor, Message};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Error, Result};

/// Reads control frames off a byte stream.
///
/// Each frame is read in full before its fields are decoded, so a field
/// decoder can never run past the declared length into the next frame.
pub struct Decoder<R> {
    reader: R,
    max_message_bytes: usize,
    payload: Vec<u8>,
    bytes_read: u64,
    // Set once a frame's first byte is read, cleared when it is complete.
    in_frame: bool,
}

impl<R: AsyncRead + Unpin> Decoder<R> {
    pub fn new(reader: R, max_message_bytes: usize) -> Self {
        Self {
            reader,
            max_message_bytes,
            payload: Vec::new(),
            bytes_read: 0,
            in_frame: false,
        }
    }

    /// Total bytes consumed from the reader so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Read the next message.
    ///
    /// Returns `Ok(None)` when the stream ends on a frame boundary. Ending
    /// anywhere else is an io error.
    ///
    /// Not cancel-safe: dropping the future after the first byte of a frame
    /// leaves the reader mid-frame, and every later call fails with
    /// [`Error::Interrupted`].
    pub async fn message(&mut self) -> Result<Option<Message>> {
        if self.in_frame {
            return Err(Error::Interrupted);
        }

        let mut first = [0u8; 1];
        if self.reader.read(&mut first).await? == 0 {
            return Ok(None);
        }
        self.in_frame = true;

        let id = self.finish_u53(first[0]).await?;

        self.reader.read_exact(&mut first).await?;
        let len = self.finish_u53(first[0]).await?;

        if len > self.max_message_bytes as u64 {
            return Err(moq_protocol::Error::MessageTooLong {
                len,
                max: self.max_message_bytes,
            }
            .into());
        }

        self.payload.resize(len as usize, 0);
        self.reader.read_exact(&mut self.payload).await?;
        self.bytes_read += len;
        self.in_frame = false;

        Ok(Some(decode_payload(id, &self.payload)?))
    }

    // Read the rest of a varint whose first byte is already in hand.
    async fn finish_u53(&mut self, first: u8) -> Result<u64> {
        let mut buf = [0u8; 8];
        buf[0] = first;
        let len = varint_len_from_first(first);
        self.reader.read_exact(&mut buf[1..len]).await?;
        self.bytes_read += len as u64;

        Ok(Cursor::new(&buf[..len]).read_u53()?)
    }
}
