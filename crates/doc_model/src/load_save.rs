//! Opaque load/save data attached to components
//!
//! Importers use this to keep attributes the model does not understand (for
//! example unknown SVG attributes) so that exporters can write them back.
//! Values are stored and re-emitted as-is and never interpreted.

use serde_json::Value;
use std::collections::BTreeMap;

/// Raw table form used in envelopes: key -> values in insertion order
pub type LoadSaveTable = BTreeMap<String, Vec<Value>>;

/// Where the entries of a [`LoadSaveData`] table came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SideChannelOrigin {
    /// Attached in this process by a loader
    #[default]
    Local,
    /// Restored from a serialized envelope, possibly written by another party
    Deserialized,
}

/// An ordered multimap from string keys to opaque values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadSaveData {
    entries: LoadSaveTable,
    origin: SideChannelOrigin,
}

impl LoadSaveData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a table read from an envelope
    pub fn from_deserialized(entries: LoadSaveTable) -> Self {
        Self {
            entries,
            origin: SideChannelOrigin::Deserialized,
        }
    }

    /// Append `value` under `key`
    pub fn attach(&mut self, key: impl Into<String>, value: Value) {
        self.entries.entry(key.into()).or_default().push(value);
    }

    /// Values attached under `key`, oldest first
    pub fn get(&self, key: &str) -> &[Value] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn entries(&self) -> &LoadSaveTable {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn origin(&self) -> SideChannelOrigin {
        self.origin
    }

    /// True if any entry was restored from an envelope rather than attached
    /// locally. Exporters should treat such data as untrusted input.
    pub fn is_untrusted(&self) -> bool {
        self.origin == SideChannelOrigin::Deserialized && !self.entries.is_empty()
    }

    /// Copy every entry of `other` onto the end of this table. Copying
    /// untrusted entries makes this table untrusted too.
    pub fn extend_from(&mut self, other: &LoadSaveData) {
        for (key, values) in &other.entries {
            self.entries
                .entry(key.clone())
                .or_default()
                .extend(values.iter().cloned());
        }
        if other.is_untrusted() {
            self.origin = SideChannelOrigin::Deserialized;
        }
    }
}
