use crate::codec::{write_string, write_u62, Cursor, Decode, Encode};
use crate::error::Result;
use crate::params::{decode_parameters, encode_parameters, Parameters};
use crate::types::TrackNamespace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announce {
    pub namespace: TrackNamespace,
    pub params: Option<Parameters>,
}

impl Encode for Announce {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
        self.namespace.encode(buf)?;
        encode_parameters(buf, self.params.as_ref())
    }
}

impl Decode for Announce {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        let namespace = TrackNamespace::decode(cursor)?;
        let params = decode_parameters(cursor)?;
        Ok(Self { namespace, params })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnounceOk {
    pub namespace: TrackNamespace,
}

impl Encode for AnnounceOk {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
        self.namespace.encode(buf)
    }
}

impl Decode for AnnounceOk {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        let namespace = TrackNamespace::decode(cursor)?;
        Ok(Self { namespace })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnounceError {
    pub namespace: TrackNamespace,
    pub code: u64,
    pub reason: String,
}

impl Encode for AnnounceError {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
        self.namespace.encode(buf)?;
        write_u62(buf, self.code)?;
        write_string(buf, &self.reason)
    }
}

impl Decode for AnnounceError {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        let namespace = TrackNamespace::decode(cursor)?;
        let code = cursor.read_u62()?;
        let reason = cursor.read_string()?;
        Ok(Self {
            namespace,
            code,
            reason,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unannounce {
    pub namespace: TrackNamespace,
}

impl Encode for Unannounce {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
        self.namespace.encode(buf)
    }
}

impl Decode for Unannounce {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        let namespace = TrackNamespace::decode(cursor)?;
        Ok(Self { namespace })
    }
}
