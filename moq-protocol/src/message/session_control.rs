use crate::codec::{write_u62, Cursor, Decode, Encode};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxSubscribeId {
    pub id: u64,
}

impl Encode for MaxSubscribeId {
    fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_u62(buf, self.id)
    }
}

impl Decode for MaxSubscribeId {
    fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        let id = cursor.read_u62()?;
        Ok(Self { id })
    }
}
