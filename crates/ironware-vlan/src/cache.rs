//! Per-pass memo of parsed VLAN dumps.
//!
//! One [`ParseCache`] belongs to one read pass and is passed explicitly to
//! every reader taking part in it. Within that pass a dump stored under a
//! given key is parsed once; later lookups reuse the result. Drop the cache
//! when the pass ends.

use std::collections::HashMap;
use tracing::debug;

use crate::model::Vlan;
use crate::parser::parse_vlans;

/// Parsed VLAN blocks keyed by the command that produced them
#[derive(Debug, Default)]
pub struct ParseCache {
    entries: HashMap<String, Vec<Vlan>>,
    parses: usize,
}

impl ParseCache {
    /// Creates an empty cache for a new pass
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `key` has already been parsed in this pass
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Cached VLANs for `key`
    pub fn get(&self, key: &str) -> Option<&[Vlan]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Returns the VLANs for `key`, parsing `raw` only on the first call.
    ///
    /// Once `key` is cached, `raw` is ignored.
    pub fn get_or_parse(&mut self, key: &str, raw: &str) -> &[Vlan] {
        if self.entries.contains_key(key) {
            debug!(key, "Parse cache hit");
        } else {
            self.parses += 1;
            let vlans = parse_vlans(raw);
            debug!(key, vlans = vlans.len(), "Parse cache miss");
            self.entries.insert(key.to_string(), vlans);
        }
        self.get(key).unwrap_or_default()
    }

    /// Number of dumps parsed so far
    pub fn parse_count(&self) -> usize {
        self.parses
    }

    /// Number of cached dumps
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
