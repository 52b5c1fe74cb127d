use std::env;
use std::str::FromStr;

use tracing::warn;

/// Track that carries the broadcast catalog.
pub const DEFAULT_CATALOG_TRACK: &str = ".catalog";

/// Close code sent when a catalog fetch fails.
pub const DEFAULT_CATALOG_ERROR_CODE: u64 = 1;

/// Largest control message payload accepted from the peer.
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 1_048_576;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub catalog_track: String,
    pub catalog_error_code: u64,
    pub max_message_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_track: DEFAULT_CATALOG_TRACK.to_string(),
            catalog_error_code: DEFAULT_CATALOG_ERROR_CODE,
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
        }
    }
}

impl Config {
    /// Defaults overridden by `MOQ_CATALOG_TRACK`, `MOQ_CATALOG_ERROR_CODE`
    /// and `MOQ_MAX_MESSAGE_BYTES`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`Config::from_env`] but reading variables through `lookup`.
    /// Values that fail to parse are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(track) = lookup("MOQ_CATALOG_TRACK") {
            if track.is_empty() {
                warn!("MOQ_CATALOG_TRACK is empty, keeping {}", config.catalog_track);
            } else {
                config.catalog_track = track;
            }
        }
        if let Some(code) = parse(&lookup, "MOQ_CATALOG_ERROR_CODE") {
            config.catalog_error_code = code;
        }
        if let Some(max) = parse(&lookup, "MOQ_MAX_MESSAGE_BYTES") {
            config.max_message_bytes = max;
        }

        config
    }
}

fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable setting");
            None
        }
    }
}
