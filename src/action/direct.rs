use std::sync::Arc;

use super::CommandAction;
use crate::core::{Result, Value};
use crate::registry::{MethodHandle, ServiceTarget};

/// Calls a registered method synchronously on its target.
#[derive(Debug, Clone)]
pub struct MethodExecutionAction {
    target: ServiceTarget,
    method: Arc<MethodHandle>,
    args: Vec<Value>,
}

impl MethodExecutionAction {
    pub fn new(target: ServiceTarget, method: Arc<MethodHandle>, args: Vec<Value>) -> Self {
        Self {
            target,
            method,
            args,
        }
    }

    pub fn target(&self) -> &ServiceTarget {
        &self.target
    }

    pub fn method(&self) -> &Arc<MethodHandle> {
        &self.method
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

impl CommandAction for MethodExecutionAction {
    fn execute(&self) -> Result<Value> {
        self.method.invoke(&self.target, &self.args)
    }

    /// Arguments are checked against the declared parameter types first,
    /// as for a lazy sub-command.
    fn execute_with_args(&self, args: &[Value]) -> Result<Value> {
        self.method.check_args(args)?;
        self.method.invoke(&self.target, args)
    }

    fn action_name(&self) -> &str {
        self.method.name()
    }
}
