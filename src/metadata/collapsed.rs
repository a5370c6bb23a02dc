use std::sync::Arc;

use crate::core::Value;

/// One request folded into a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct CollapsedRequest {
    argument: Value,
}

impl CollapsedRequest {
    pub fn new(argument: Value) -> Self {
        Self { argument }
    }

    pub fn argument(&self) -> &Value {
        &self.argument
    }
}

/// Shared handle to the requests collapsed into the current invocation.
///
/// Resolution never looks inside the batch; it only hands the same handle
/// on, so cloning keeps identity (see [`CollapsedBatch::same_batch`]).
#[derive(Debug, Clone, Default)]
pub struct CollapsedBatch {
    requests: Arc<Vec<CollapsedRequest>>,
}

impl CollapsedBatch {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(requests: Vec<CollapsedRequest>) -> Self {
        Self {
            requests: Arc::new(requests),
        }
    }

    pub fn from_arguments(arguments: impl IntoIterator<Item = Value>) -> Self {
        Self::new(arguments.into_iter().map(CollapsedRequest::new).collect())
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollapsedRequest> {
        self.requests.iter()
    }

    pub fn arguments(&self) -> Vec<Value> {
        self.requests.iter().map(|r| r.argument.clone()).collect()
    }

    pub fn same_batch(&self, other: &CollapsedBatch) -> bool {
        Arc::ptr_eq(&self.requests, &other.requests)
    }
}
