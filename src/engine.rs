use crate::core::{Result, Value};
use crate::metadata::CollapsedBatch;
use crate::resolver::CommandDescription;

/// Entry point of the component that actually runs commands under circuit,
/// timeout and thread pool policies.
///
/// Resolution never calls this. Only a lazy sub-command action does, when
/// the engine itself invokes that action as a fallback.
pub trait ExecutionEngine: Send + Sync {
    fn run_resolved(&self, description: CommandDescription, collapsed: CollapsedBatch)
        -> Result<Value>;
}
