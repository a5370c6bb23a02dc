use super::CommandAction;
use crate::core::{Result, Value};
use crate::metadata::{CollapsedBatch, InvocationMetadata};
use crate::resolver::{CommandResolver, non_empty_or};

/// A fallback that is itself a protected command.
///
/// Holding it costs nothing: the nested command is resolved through the
/// owning resolver and handed to the execution engine only on invocation,
/// together with the batch the outer command was created for.
#[derive(Debug, Clone)]
pub struct LazyCommandAction {
    resolver: CommandResolver,
    metadata: InvocationMetadata,
    collapsed: CollapsedBatch,
    name: String,
}

impl LazyCommandAction {
    pub fn new(
        resolver: CommandResolver,
        metadata: InvocationMetadata,
        collapsed: CollapsedBatch,
    ) -> Self {
        let declared = metadata
            .command_annotation()
            .map(|annotation| annotation.command_key.as_str())
            .unwrap_or_default();
        let name = non_empty_or(declared, metadata.default_command_key()).to_string();
        Self {
            resolver,
            metadata,
            collapsed,
            name,
        }
    }

    /// Metadata the nested command will be resolved from.
    pub fn metadata(&self) -> &InvocationMetadata {
        &self.metadata
    }

    pub fn collapsed(&self) -> &CollapsedBatch {
        &self.collapsed
    }

    fn run(&self, metadata: &InvocationMetadata) -> Result<Value> {
        let description = self.resolver.resolve(metadata, &self.collapsed)?;
        self.resolver
            .engine()
            .run_resolved(description, self.collapsed.clone())
    }
}

impl CommandAction for LazyCommandAction {
    fn execute(&self) -> Result<Value> {
        self.run(&self.metadata)
    }

    fn execute_with_args(&self, args: &[Value]) -> Result<Value> {
        let metadata = self.metadata.with_args(args.to_vec())?;
        self.run(&metadata)
    }

    fn action_name(&self) -> &str {
        &self.name
    }
}
