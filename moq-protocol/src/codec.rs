//! Buffer read/write helpers and Encode/Decode traits for sans-IO protocol parsing.

use crate::error::{Error, Result};
use crate::varint::{decode_varint, encode_u53, encode_varint, MAX_U53};

// ---------------------------------------------------------------------------
// Cursor: zero-copy reader over a byte slice
// ---------------------------------------------------------------------------

/// A cursor for reading structured data from a byte slice.
///
/// Tracks the current read position; every read is bounds checked and fails
/// with [`Error::BufferTooShort`] rather than panicking on partial input.
#[derive(Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Remaining unread bytes.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let v = *self.buf.get(self.pos).ok_or(Error::BufferTooShort)?;
        self.pos += 1;
        Ok(v)
    }

    /// Read a varint in the full 62-bit domain.
    pub fn read_u62(&mut self) -> Result<u64> {
        let (v, n) = decode_varint(&self.buf[self.pos..])?;
        self.pos += n;
        Ok(v)
    }

    /// Read a varint restricted to the 53-bit domain.
    pub fn read_u53(&mut self) -> Result<u64> {
        let v = self.read_u62()?;
        if v > MAX_U53 {
            return Err(Error::IntegerOverflow(v));
        }
        Ok(v)
    }

    /// Read a 53-bit length and convert it to `usize`.
    pub fn read_len(&mut self) -> Result<usize> {
        let len = self.read_u53()?;
        usize::try_from(len).map_err(|_| Error::IntegerOverflow(len))
    }

    /// Read exactly `len` bytes, returning a sub-slice.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(Error::BufferTooShort);
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_len()?;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| Error::InvalidUtf8)
    }

    /// Read the one-byte flag that precedes an optional field.
    pub fn read_presence(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            flag => Err(Error::InvalidPresenceFlag(flag)),
        }
    }
}

// ---------------------------------------------------------------------------
// Encode / Decode traits
// ---------------------------------------------------------------------------

/// Trait for types that can be encoded to a byte buffer.
pub trait Encode {
    /// Encode this value, appending bytes to `buf`.
    fn encode(&self, buf: &mut Vec<u8>) -> Result<()>;

    fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode(&mut buf)?;
        Ok(buf)
    }
}

/// Trait for types that can be decoded from a byte cursor.
pub trait Decode: Sized {
    /// Decode a value from the cursor, advancing its position.
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self>;
}

// ---------------------------------------------------------------------------
// Buffer write helpers
// ---------------------------------------------------------------------------

pub fn write_u8(buf: &mut Vec<u8>, v: u8) {
    buf.push(v);
}

/// Write a varint in the full 62-bit domain.
pub fn write_u62(buf: &mut Vec<u8>, v: u64) -> Result<()> {
    encode_varint(buf, v)
}

/// Write a varint restricted to the 53-bit domain.
pub fn write_u53(buf: &mut Vec<u8>, v: u64) -> Result<()> {
    encode_u53(buf, v)
}

/// Write a length-prefixed UTF-8 string.
pub fn write_string(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    write_u53(buf, s.len() as u64)?;
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Write an optional value behind its presence flag.
pub fn write_optional<T: Encode>(buf: &mut Vec<u8>, value: Option<&T>) -> Result<()> {
    match value {
        Some(v) => {
            write_u8(buf, 1);
            v.encode(buf)
        }
        None => {
            write_u8(buf, 0);
            Ok(())
        }
    }
}

/// Read an optional value behind its presence flag.
pub fn read_optional<T: Decode>(cursor: &mut Cursor<'_>) -> Result<Option<T>> {
    if cursor.read_presence()? {
        Ok(Some(T::decode(cursor)?))
    } else {
        Ok(None)
    }
}
