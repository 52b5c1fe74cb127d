use std::fmt;

use crate::codec::{write_string, write_u53, write_u62, write_u8, Cursor, Decode, Encode};
use crate::error::{Error, Result};

/// An ordered tuple of UTF-8 segments naming a broadcast's scope.
///
/// The empty tuple is a valid namespace; individual segments are not
/// allowed to be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TrackNamespace {
    pub fields: Vec<String>,
}

impl TrackNamespace {
    pub fn new(fields: Vec<String>) -> Result<Self> {
        if fields.iter().any(|f| f.is_empty()) {
            return Err(Error::InvalidTrackNamespace(
                "namespace field must not be empty".into(),
            ));
        }
        Ok(Self { fields })
    }

    pub fn from_strings(parts: &[&str]) -> Result<Self> {
        Self::new(parts.iter().map(|s| s.to_string()).collect())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for TrackNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fields.join("/"))
    }
}

impl Encode for TrackNamespace {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_u53(buf, self.fields.len() as u64)?;
        for field in &self.fields {
            if field.is_empty() {
                return Err(Error::InvalidTrackNamespace(
                    "namespace field must not be empty".into(),
                ));
            }
            write_string(buf, field)?;
        }
        Ok(())
    }
}

impl Decode for TrackNamespace {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        let count = cursor.read_len()?;
        // Every field costs at least one byte; don't trust `count` for the allocation.
        let mut fields = Vec::with_capacity(count.min(cursor.remaining()));
        for _ in 0..count {
            let field = cursor.read_string()?;
            if field.is_empty() {
                return Err(Error::InvalidTrackNamespace(
                    "namespace field must not be empty".into(),
                ));
            }
            fields.push(field);
        }
        Ok(Self { fields })
    }
}

/// Delivery order of groups within a track, carried as a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupOrder {
    /// The publisher decides.
    #[default]
    Publisher,
    Ascending,
    Descending,
}

impl GroupOrder {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Publisher => 0x0,
            Self::Ascending => 0x1,
            Self::Descending => 0x2,
        }
    }

    pub fn from_u8(v: u8) -> Result<Self> {
        match v {
            0x0 => Ok(Self::Publisher),
            0x1 => Ok(Self::Ascending),
            0x2 => Ok(Self::Descending),
            _ => Err(Error::InvalidGroupOrder(v)),
        }
    }
}

impl Encode for GroupOrder {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_u8(buf, self.as_u8());
        Ok(())
    }
}

impl Decode for GroupOrder {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        Self::from_u8(cursor.read_u8()?)
    }
}

/// A (group, object) pair of sequence numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub group: u64,
    pub object: u64,
}

impl Position {
    pub fn new(group: u64, object: u64) -> Self {
        Self { group, object }
    }
}

impl Encode for Position {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_u53(buf, self.group)?;
        write_u53(buf, self.object)?;
        Ok(())
    }
}

impl Decode for Position {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        let group = cursor.read_u53()?;
        let object = cursor.read_u53()?;
        Ok(Self { group, object })
    }
}

const MODE_LATEST_GROUP: u64 = 0x1;
const MODE_LATEST_OBJECT: u64 = 0x2;
const MODE_ABSOLUTE_START: u64 = 0x3;
const MODE_ABSOLUTE_RANGE: u64 = 0x4;

/// Where a subscription starts (and optionally ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Location {
    #[default]
    LatestGroup,
    LatestObject,
    AbsoluteStart {
        start: Position,
    },
    AbsoluteRange {
        start: Position,
        end: Position,
    },
}

impl Location {
    pub fn mode(&self) -> u64 {
        match self {
            Self::LatestGroup => MODE_LATEST_GROUP,
            Self::LatestObject => MODE_LATEST_OBJECT,
            Self::AbsoluteStart { .. } => MODE_ABSOLUTE_START,
            Self::AbsoluteRange { .. } => MODE_ABSOLUTE_RANGE,
        }
    }
}

impl Encode for Location {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_u62(buf, self.mode())?;
        match self {
            Self::LatestGroup | Self::LatestObject => Ok(()),
            Self::AbsoluteStart { start } => start.encode(buf),
            Self::AbsoluteRange { start, end } => {
                start.encode(buf)?;
                end.encode(buf)
            }
        }
    }
}

impl Decode for Location {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        match cursor.read_u62()? {
            MODE_LATEST_GROUP => Ok(Self::LatestGroup),
            MODE_LATEST_OBJECT => Ok(Self::LatestObject),
            MODE_ABSOLUTE_START => Ok(Self::AbsoluteStart {
                start: Position::decode(cursor)?,
            }),
            MODE_ABSOLUTE_RANGE => {
                let start = Position::decode(cursor)?;
                let end = Position::decode(cursor)?;
                Ok(Self::AbsoluteRange { start, end })
            }
            mode => Err(Error::InvalidLocationMode(mode)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::varint::MAX_U53;

    #[test]
    fn track_namespace_roundtrip() {
        let ns = TrackNamespace::from_strings(&["example.com", "meeting", "room1"]).unwrap();
        let buf = ns.encode_to_vec().unwrap();
        let mut c = Cursor::new(&buf);
        assert_eq!(TrackNamespace::decode(&mut c).unwrap(), ns);
        assert_eq!(c.remaining(), 0);
        assert_eq!(ns.to_string(), "example.com/meeting/room1");
    }

    #[test]
    fn empty_track_namespace_is_one_byte() {
        let ns = TrackNamespace::default();
        assert_eq!(ns.encode_to_vec().unwrap(), vec![0x00]);
    }

    #[test]
    fn empty_field_rejected() {
        assert!(TrackNamespace::from_strings(&["a", ""]).is_err());

        let buf = [0x02, 0x01, b'a', 0x00];
        let mut c = Cursor::new(&buf);
        assert!(matches!(
            TrackNamespace::decode(&mut c),
            Err(Error::InvalidTrackNamespace(_))
        ));
    }

    #[test]
    fn namespace_field_order_matters() {
        let ab = TrackNamespace::from_strings(&["a", "b"]).unwrap();
        let ba = TrackNamespace::from_strings(&["b", "a"]).unwrap();
        assert_ne!(ab, ba);
        assert_ne!(ab.encode_to_vec().unwrap(), ba.encode_to_vec().unwrap());
    }

    #[test]
    fn group_order_bytes() {
        for order in [
            GroupOrder::Publisher,
            GroupOrder::Ascending,
            GroupOrder::Descending,
        ] {
            assert_eq!(GroupOrder::from_u8(order.as_u8()).unwrap(), order);
        }
        assert_eq!(GroupOrder::default(), GroupOrder::Publisher);
        assert_eq!(GroupOrder::from_u8(3), Err(Error::InvalidGroupOrder(3)));
        assert_eq!(GroupOrder::from_u8(0xff), Err(Error::InvalidGroupOrder(0xff)));
    }

    #[test]
    fn location_roundtrip() {
        let locations = [
            Location::LatestGroup,
            Location::LatestObject,
            Location::AbsoluteStart {
                start: Position::new(10, 5),
            },
            Location::AbsoluteRange {
                start: Position::new(1, 0),
                end: Position::new(MAX_U53, MAX_U53),
            },
        ];
        for location in locations {
            let buf = location.encode_to_vec().unwrap();
            assert_eq!(buf[0] as u64, location.mode());
            let mut c = Cursor::new(&buf);
            assert_eq!(Location::decode(&mut c).unwrap(), location);
            assert_eq!(c.remaining(), 0);
        }
    }

    #[test]
    fn absolute_range_uses_its_own_mode() {
        let range = Location::AbsoluteRange {
            start: Position::new(1, 2),
            end: Position::new(3, 4),
        };
        assert_eq!(range.encode_to_vec().unwrap(), vec![0x04, 1, 2, 3, 4]);
    }

    #[test]
    fn location_mode_out_of_range() {
        for mode in [0u8, 5, 0x3f] {
            let buf = [mode];
            let mut c = Cursor::new(&buf);
            assert_eq!(
                Location::decode(&mut c),
                Err(Error::InvalidLocationMode(mode as u64))
            );
        }
    }

    #[test]
    fn position_beyond_u53_rejected() {
        let p = Position::new(MAX_U53 + 1, 0);
        assert_eq!(p.encode_to_vec(), Err(Error::IntegerOverflow(MAX_U53 + 1)));
    }
}
