//! QUIC variable-length integer encoding (RFC 9000 §16).
//!
//! The two most-significant bits of the first byte select the width:
//!
//! | 2MSB | Length | Usable Bits | Max Value              |
//! |------|--------|-------------|------------------------|
//! | 00   | 1      | 6           | 63                     |
//! | 01   | 2      | 14          | 16383                  |
//! | 10   | 4      | 30          | 1073741823             |
//! | 11   | 8      | 62          | 4611686018427387903    |
//!
//! Control messages read varints into two domains. Identifiers, codes and
//! expiries use the full 62 bits. Counts, lengths and group/object sequence
//! numbers are restricted to 53 bits so they stay exact in peers that carry
//! them as IEEE doubles.

use bytes::BufMut;

use crate::error::{Error, Result};

/// Maximum value representable as a QUIC varint.
pub const MAX_VARINT: u64 = (1 << 62) - 1;

/// Maximum value of the 53-bit numeric domain.
pub const MAX_U53: u64 = (1 << 53) - 1;

/// Returns the number of bytes needed to encode `v` as a QUIC varint.
pub const fn varint_len(v: u64) -> usize {
    match v {
        0..=63 => 1,
        64..=16_383 => 2,
        16_384..=1_073_741_823 => 4,
        _ => 8,
    }
}

/// Number of bytes a varint occupies, given its first byte.
pub const fn varint_len_from_first(first: u8) -> usize {
    1 << (first >> 6)
}

/// Encode `v` into `buf`.
pub fn encode_varint<B: BufMut>(buf: &mut B, v: u64) -> Result<()> {
    if v > MAX_VARINT {
        return Err(Error::VarintOverflow);
    }
    match varint_len(v) {
        1 => buf.put_u8(v as u8),
        2 => buf.put_u16(0x4000 | v as u16),
        4 => buf.put_u32(0x8000_0000 | v as u32),
        _ => buf.put_u64(0xc000_0000_0000_0000 | v),
    }
    Ok(())
}

/// Encode `v` into `buf`, rejecting values outside the 53-bit domain.
pub fn encode_u53<B: BufMut>(buf: &mut B, v: u64) -> Result<()> {
    if v > MAX_U53 {
        return Err(Error::IntegerOverflow(v));
    }
    encode_varint(buf, v)
}

/// Decode a varint from the start of `buf`.
///
/// Returns `(value, bytes_consumed)`.
pub fn decode_varint(buf: &[u8]) -> Result<(u64, usize)> {
    let first = *buf.first().ok_or(Error::BufferTooShort)?;
    let len = varint_len_from_first(first);
    let bytes = buf.get(..len).ok_or(Error::BufferTooShort)?;
    let v = bytes[1..]
        .iter()
        .fold(u64::from(first & 0x3f), |acc, &b| (acc << 8) | u64::from(b));
    Ok((v, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_width_roundtrips() {
        let values: &[u64] = &[
            0,
            63,
            64,
            16_383,
            16_384,
            1_073_741_823,
            1_073_741_824,
            MAX_U53,
            MAX_VARINT,
        ];
        for &v in values {
            let mut buf = Vec::new();
            encode_varint(&mut buf, v).unwrap();
            assert_eq!(buf.len(), varint_len(v), "width of {v}");
            assert_eq!(varint_len_from_first(buf[0]), buf.len());
            assert_eq!(decode_varint(&buf).unwrap(), (v, buf.len()));
        }
    }

    #[test]
    fn overflow_rejected() {
        let mut buf = Vec::new();
        assert_eq!(
            encode_varint(&mut buf, MAX_VARINT + 1),
            Err(Error::VarintOverflow)
        );
        assert_eq!(
            encode_u53(&mut buf, MAX_U53 + 1),
            Err(Error::IntegerOverflow(MAX_U53 + 1))
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn short_buffer() {
        assert_eq!(decode_varint(&[]), Err(Error::BufferTooShort));
        assert_eq!(decode_varint(&[0x40]), Err(Error::BufferTooShort));
        assert_eq!(decode_varint(&[0xc0, 0, 0, 0]), Err(Error::BufferTooShort));
    }

    #[test]
    fn rfc_test_vectors() {
        assert_eq!(
            decode_varint(&[0xc2, 0x19, 0x7c, 0x5e, 0xff, 0x14, 0xe8, 0x8c]).unwrap(),
            (151_288_809_941_952_652, 8)
        );
        assert_eq!(
            decode_varint(&[0x9d, 0x7f, 0x3e, 0x7d]).unwrap(),
            (494_878_333, 4)
        );
        assert_eq!(decode_varint(&[0x7b, 0xbd]).unwrap(), (15_293, 2));
        assert_eq!(decode_varint(&[0x25]).unwrap(), (37, 1));
    }
}
