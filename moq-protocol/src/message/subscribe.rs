use crate::codec::{
    read_optional, write_optional, write_string, write_u62, write_u8, Cursor, Decode, Encode,
};
use crate::error::Result;
use crate::params::{decode_parameters, encode_parameters, Parameters};
use crate::types::{GroupOrder, Location, Position, TrackNamespace};

/// Priority used when the subscriber has no preference.
pub const DEFAULT_SUBSCRIBER_PRIORITY: u8 = 127;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscribe {
    pub id: u64,
    pub track_id: u64,
    pub namespace: TrackNamespace,
    pub name: String,
    pub subscriber_priority: u8,
    pub group_order: GroupOrder,
    pub location: Location,
    pub params: Option<Parameters>,
}

impl Subscribe {
    /// A subscription with the default priority, publisher group order and
    /// a start at the latest group.
    pub fn new(id: u64, track_id: u64, namespace: TrackNamespace, name: impl Into<String>) -> Self {
        Self {
            id,
            track_id,
            namespace,
            name: name.into(),
            subscriber_priority: DEFAULT_SUBSCRIBER_PRIORITY,
            group_order: GroupOrder::default(),
            location: Location::default(),
            params: None,
        }
    }
}

impl Encode for Subscribe {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_u62(buf, self.id)?;
        write_u62(buf, self.track_id)?;
        self.namespace.encode(buf)?;
        write_string(buf, &self.name)?;
        write_u8(buf, self.subscriber_priority);
        self.group_order.encode(buf)?;
        self.location.encode(buf)?;
        encode_parameters(buf, self.params.as_ref())
    }
}

impl Decode for Subscribe {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        let id = cursor.read_u62()?;
        let track_id = cursor.read_u62()?;
        let namespace = TrackNamespace::decode(cursor)?;
        let name = cursor.read_string()?;
        let subscriber_priority = cursor.read_u8()?;
        let group_order = GroupOrder::decode(cursor)?;
        let location = Location::decode(cursor)?;
        let params = decode_parameters(cursor)?;
        Ok(Self {
            id,
            track_id,
            namespace,
            name,
            subscriber_priority,
            group_order,
            location,
            params,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeOk {
    pub id: u64,
    pub expires: u64,
    pub group_order: GroupOrder,
    /// Largest (group, object) published so far, if any.
    pub latest: Option<Position>,
    pub params: Option<Parameters>,
}

impl Encode for SubscribeOk {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_u62(buf, self.id)?;
        write_u62(buf, self.expires)?;
        self.group_order.encode(buf)?;
        write_optional(buf, self.latest.as_ref())?;
        encode_parameters(buf, self.params.as_ref())
    }
}

impl Decode for SubscribeOk {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        let id = cursor.read_u62()?;
        let expires = cursor.read_u62()?;
        let group_order = GroupOrder::decode(cursor)?;
        let latest = read_optional(cursor)?;
        let params = decode_parameters(cursor)?;
        Ok(Self {
            id,
            expires,
            group_order,
            latest,
            params,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeError {
    pub id: u64,
    pub code: u64,
    pub reason: String,
}

impl Encode for SubscribeError {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_u62(buf, self.id)?;
        write_u62(buf, self.code)?;
        write_string(buf, &self.reason)
    }
}

impl Decode for SubscribeError {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        let id = cursor.read_u62()?;
        let code = cursor.read_u62()?;
        let reason = cursor.read_string()?;
        Ok(Self { id, code, reason })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeDone {
    pub id: u64,
    pub code: u64,
    pub reason: String,
    /// Last (group, object) delivered, if the publisher reports one.
    pub final_position: Option<Position>,
}

impl Encode for SubscribeDone {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_u62(buf, self.id)?;
        write_u62(buf, self.code)?;
        write_string(buf, &self.reason)?;
        write_optional(buf, self.final_position.as_ref())
    }
}

impl Decode for SubscribeDone {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        let id = cursor.read_u62()?;
        let code = cursor.read_u62()?;
        let reason = cursor.read_string()?;
        let final_position = read_optional(cursor)?;
        Ok(Self {
            id,
            code,
            reason,
            final_position,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsubscribe {
    pub id: u64,
}

impl Encode for Unsubscribe {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_u62(buf, self.id)
    }
}

impl Decode for Unsubscribe {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        let id = cursor.read_u62()?;
        Ok(Self { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn subscribe_defaults() {
        let ns = TrackNamespace::from_strings(&["live"]).unwrap();
        let sub = Subscribe::new(1, 2, ns, ".catalog");
        assert_eq!(sub.subscriber_priority, 127);
        assert_eq!(sub.group_order, GroupOrder::Publisher);
        assert_eq!(sub.location, Location::LatestGroup);

        // id, track id, ns count, "live", ".catalog", priority, order, mode, params
        let mut expected = vec![0x01, 0x02, 0x01, 0x04];
        expected.extend_from_slice(b"live");
        expected.push(0x08);
        expected.extend_from_slice(b".catalog");
        expected.extend_from_slice(&[127, 0x00, 0x01, 0x00]);
        assert_eq!(sub.encode_to_vec().unwrap(), expected);
    }

    #[test]
    fn subscribe_ok_without_latest() {
        let ok = SubscribeOk {
            id: 7,
            expires: 0,
            group_order: GroupOrder::Descending,
            latest: None,
            params: None,
        };
        let buf = ok.encode_to_vec().unwrap();
        assert_eq!(buf, vec![0x07, 0x00, 0x02, 0x00, 0x00]);

        let mut c = Cursor::new(&buf);
        assert_eq!(SubscribeOk::decode(&mut c).unwrap(), ok);
    }

    #[test]
    fn subscribe_ok_bad_presence_flag() {
        let buf = [0x07, 0x00, 0x02, 0x02, 0x00];
        let mut c = Cursor::new(&buf);
        assert_eq!(
            SubscribeOk::decode(&mut c),
            Err(Error::InvalidPresenceFlag(2))
        );
    }

    #[test]
    fn subscribe_done_with_final() {
        let done = SubscribeDone {
            id: 3,
            code: 0x3,
            reason: "track ended".into(),
            final_position: Some(Position::new(12, 4)),
        };
        let buf = done.encode_to_vec().unwrap();
        let mut c = Cursor::new(&buf);
        assert_eq!(SubscribeDone::decode(&mut c).unwrap(), done);
        assert_eq!(c.remaining(), 0);
    }
}
