use serde::Serialize;
use std::collections::BTreeMap;

use crate::annotation::PropertyEntry;

/// Engine-specific command properties, kept as an opaque name/value map.
///
/// Names are not validated here; the execution engine owns their meaning.
/// There is no mutating API once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommandProperties {
    entries: BTreeMap<String, String>,
}

impl CommandProperties {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Copy declared entries verbatim. A repeated name keeps its last value.
    pub fn from_entries(entries: &[PropertyEntry]) -> Self {
        let entries = entries
            .iter()
            .map(|entry| (entry.name.clone(), entry.value.clone()))
            .collect();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
