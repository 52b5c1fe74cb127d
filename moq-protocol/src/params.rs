use std::collections::btree_map::{self, BTreeMap};

use crate::codec::{write_u53, write_u62, Cursor};
use crate::error::{Error, Result};

pub const PARAM_ROLE: u64 = 0x00;
pub const PARAM_PATH: u64 = 0x01;
pub const PARAM_AUTHORIZATION_INFO: u64 = 0x02;
pub const PARAM_DELIVERY_TIMEOUT: u64 = 0x03;
pub const PARAM_MAX_CACHE_DURATION: u64 = 0x04;

/// Extensible id → bytes side-channel attached to several messages.
///
/// Ids are unique within one message; values are opaque. Messages carry
/// `Option<Parameters>` because a count of zero on the wire means the
/// parameters are absent, not present and empty. Encoding a present but
/// empty map therefore decodes back as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parameters(BTreeMap<u64, Vec<u8>>);

impl Parameters {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert a value, returning the previous value for `id` if any.
    pub fn insert(&mut self, id: u64, value: impl Into<Vec<u8>>) -> Option<Vec<u8>> {
        self.0.insert(id, value.into())
    }

    pub fn get(&self, id: u64) -> Option<&[u8]> {
        self.0.get(&id).map(Vec::as_slice)
    }

    pub fn remove(&mut self, id: u64) -> Option<Vec<u8>> {
        self.0.remove(&id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.0.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, u64, Vec<u8>> {
        self.0.iter()
    }

    pub fn authorization_info(&self) -> Option<&str> {
        self.get(PARAM_AUTHORIZATION_INFO)
            .and_then(|v| std::str::from_utf8(v).ok())
    }

    pub fn set_authorization_info(&mut self, token: &str) {
        self.insert(PARAM_AUTHORIZATION_INFO, token.as_bytes());
    }
}

impl FromIterator<(u64, Vec<u8>)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (u64, Vec<u8>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = (&'a u64, &'a Vec<u8>);
    type IntoIter = btree_map::Iter<'a, u64, Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Write the parameter count followed by (id, length, bytes) triples.
/// Absent parameters are a bare zero count.
pub fn encode_parameters(buf: &mut Vec<u8>, params: Option<&Parameters>) -> Result<()> {
    let Some(params) = params else {
        return write_u53(buf, 0);
    };
    write_u53(buf, params.len() as u64)?;
    for (&id, value) in params {
        write_u62(buf, id)?;
        write_u53(buf, value.len() as u64)?;
        buf.extend_from_slice(value);
    }
    Ok(())
}

pub fn decode_parameters(cursor: &mut Cursor<'_>) -> Result<Option<Parameters>> {
    let count = cursor.read_len()?;
    if count == 0 {
        return Ok(None);
    }

    let mut params = Parameters::new();
    for _ in 0..count {
        let id = cursor.read_u62()?;
        let len = cursor.read_len()?;
        let value = cursor.read_bytes(len)?;
        if params.contains(id) {
            return Err(Error::DuplicateParameter(id));
        }
        params.insert(id, value);
    }
    Ok(Some(params))
}
