//! Declared command and collapser configuration.
//!
//! These are the values an interceptor reads off a protected method. They
//! are plain data: nothing here is validated until the resolver maps it.

use serde::{Deserialize, Serialize};

/// A single `name = value` property as written on a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyEntry {
    pub name: String,
    pub value: String,
}

impl PropertyEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl<N: Into<String>, V: Into<String>> From<(N, V)> for PropertyEntry {
    fn from((name, value): (N, V)) -> Self {
        Self::new(name, value)
    }
}

/// Declaration that marks a method as a protected command.
///
/// Empty strings mean "not declared": the resolver substitutes computed
/// defaults for the group and command keys, and an empty fallback name
/// means the command has no fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommandAnnotation {
    pub group_key: String,
    pub command_key: String,
    pub thread_pool_key: String,
    pub fallback_method: String,
    pub command_properties: Vec<PropertyEntry>,
    pub thread_pool_properties: Vec<PropertyEntry>,
    /// Error kinds the engine must not count as failures.
    pub ignore_exceptions: Vec<String>,
}

impl CommandAnnotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group_key(mut self, group_key: &str) -> Self {
        self.group_key = group_key.to_string();
        self
    }

    pub fn command_key(mut self, command_key: &str) -> Self {
        self.command_key = command_key.to_string();
        self
    }

    pub fn thread_pool_key(mut self, thread_pool_key: &str) -> Self {
        self.thread_pool_key = thread_pool_key.to_string();
        self
    }

    pub fn fallback_method(mut self, fallback_method: &str) -> Self {
        self.fallback_method = fallback_method.to_string();
        self
    }

    pub fn command_property(mut self, name: &str, value: &str) -> Self {
        self.command_properties.push(PropertyEntry::new(name, value));
        self
    }

    pub fn thread_pool_property(mut self, name: &str, value: &str) -> Self {
        self.thread_pool_properties.push(PropertyEntry::new(name, value));
        self
    }

    pub fn ignore_exception(mut self, kind: &str) -> Self {
        self.ignore_exceptions.push(kind.to_string());
        self
    }

    pub fn has_fallback(&self) -> bool {
        !self.fallback_method.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollapserScope {
    #[default]
    Request,
    Global,
}

/// Declaration that batches calls to a method. Carried through resolution
/// untouched; only the engine interprets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollapserAnnotation {
    pub collapser_key: String,
    pub batch_method: String,
    pub scope: CollapserScope,
    pub collapser_properties: Vec<PropertyEntry>,
}

impl CollapserAnnotation {
    pub fn new(batch_method: &str) -> Self {
        Self {
            batch_method: batch_method.to_string(),
            ..Self::default()
        }
    }

    pub fn collapser_key(mut self, collapser_key: &str) -> Self {
        self.collapser_key = collapser_key.to_string();
        self
    }

    pub fn scope(mut self, scope: CollapserScope) -> Self {
        self.scope = scope;
        self
    }
}
