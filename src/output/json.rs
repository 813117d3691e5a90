//! JSON envelope for `--format json`
//!
//! Every document is `{ "kind": ..., "data": ..., "meta": ... }` so scripts
//! can tell a lineup from a cache report without sniffing fields.

use chrono::Utc;
use serde::Serialize;

/// Payload tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Lineup,
    CacheStatus,
    CacheClear,
}

#[derive(Debug, Serialize)]
pub struct Envelope<'a, T: ?Sized> {
    pub kind: Kind,
    pub data: &'a T,
    pub meta: Metadata,
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    /// RFC 3339 time the document was produced
    pub generated_at: String,
    pub version: &'static str,
}

impl<'a, T: ?Sized> Envelope<'a, T> {
    pub fn new(kind: Kind, data: &'a T) -> Self {
        Self {
            kind,
            data,
            meta: Metadata {
                generated_at: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }
}

/// Pretty-printed envelope around `data`
pub fn format_json<T: Serialize + ?Sized>(kind: Kind, data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Envelope::new(kind, data))
}
