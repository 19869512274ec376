//! Style interning table.
//!
//! Content-addressed deduplication of style payloads within one document
//! conversion. Identical values map to a single stored key; a second request
//! to store an equal value returns the existing key unchanged. Keys are never
//! overwritten or removed, and the table lives exactly as long as one
//! conversion call.
//!
//! Lookup hashes the value's canonical JSON form with blake3 and buckets by
//! the first eight bytes, falling back to full structural equality inside a
//! bucket, so interning stays linear in bucket size rather than table size.

use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;

use crate::effects::SimplifiedEffects;
use crate::layout::SimplifiedLayout;
use crate::paint::SimplifiedFill;
use crate::source::TypeStyle;
use crate::stroke::SimplifiedStroke;

// =============================================================================
// StyleValue
// =============================================================================

/// One interned style payload.
///
/// Serializes untagged, so the table's wire form is a flat key → payload map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StyleValue {
    TextStyle(TypeStyle),
    Fills(Vec<SimplifiedFill>),
    Stroke(SimplifiedStroke),
    Effects(SimplifiedEffects),
    Layout(SimplifiedLayout),
    /// Raw style-override table, kept as-is.
    Overrides(Value),
}

// =============================================================================
// StyleTable
// =============================================================================

/// Interning table for one document conversion.
///
/// Not for sharing across conversions: keys are only meaningful within the
/// document whose walk produced them.
#[derive(Debug, Default)]
pub struct StyleTable {
    /// Entries in insertion order; serialization preserves it.
    entries: Vec<(String, StyleValue)>,
    /// Content hash → indices into `entries`.
    buckets: FxHashMap<u64, SmallVec<[usize; 2]>>,
    /// Key counter, shared across prefixes.
    counter: u64,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a value under a prefix, returning its key.
    ///
    /// Returns the existing key when a structurally equal value is already
    /// stored (under any prefix); otherwise mints `PREFIX_n` from the
    /// table-private counter and stores the value. First writer wins.
    pub fn intern(&mut self, value: StyleValue, prefix: &str) -> String {
        let hash = content_hash(&value);
        if let Some(indices) = self.buckets.get(&hash) {
            for &index in indices {
                if self.entries[index].1 == value {
                    return self.entries[index].0.clone();
                }
            }
        }

        let key = format!("{prefix}_{}", self.counter);
        self.counter += 1;
        self.buckets.entry(hash).or_default().push(self.entries.len());
        self.entries.push((key.clone(), value));
        key
    }

    /// Look up a stored value by key.
    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.entries
            .iter()
            .find(|(stored, _)| stored == key)
            .map(|(_, value)| value)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl Serialize for StyleTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Stable 64-bit content hash of a payload's canonical JSON form.
fn content_hash(value: &StyleValue) -> u64 {
    let canonical = serde_json::to_vec(value).unwrap_or_default();
    let hash = blake3::hash(&canonical);
    let bytes: [u8; 8] = hash.as_bytes()[..8].try_into().unwrap_or_default();
    u64::from_le_bytes(bytes)
}

// =============================================================================
// Tests
// =============================================================================
