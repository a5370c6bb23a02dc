mod direct;
mod lazy;

pub use direct::MethodExecutionAction;
pub use lazy::LazyCommandAction;

use crate::core::{Result, Value};

/// Something the execution engine can invoke.
pub trait CommandAction: Send + Sync {
    /// Run with the arguments captured at resolution time.
    fn execute(&self) -> Result<Value>;

    /// Run with a substitute argument list, e.g. the arguments of a collapsed batch.
    fn execute_with_args(&self, args: &[Value]) -> Result<Value>;

    fn action_name(&self) -> &str;
}

#[derive(Debug, Clone)]
pub enum Action {
    /// Plain method call, no protection of its own.
    Direct(MethodExecutionAction),
    /// Protected fallback, resolved and dispatched only when invoked.
    LazySubCommand(LazyCommandAction),
}

impl Action {
    pub fn is_direct(&self) -> bool {
        matches!(self, Self::Direct(_))
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Self::LazySubCommand(_))
    }

    pub fn as_direct(&self) -> Option<&MethodExecutionAction> {
        match self {
            Self::Direct(action) => Some(action),
            Self::LazySubCommand(_) => None,
        }
    }

    pub fn as_lazy(&self) -> Option<&LazyCommandAction> {
        match self {
            Self::LazySubCommand(action) => Some(action),
            Self::Direct(_) => None,
        }
    }
}

impl CommandAction for Action {
    fn execute(&self) -> Result<Value> {
        match self {
            Self::Direct(action) => action.execute(),
            Self::LazySubCommand(action) => action.execute(),
        }
    }

    fn execute_with_args(&self, args: &[Value]) -> Result<Value> {
        match self {
            Self::Direct(action) => action.execute_with_args(args),
            Self::LazySubCommand(action) => action.execute_with_args(args),
        }
    }

    fn action_name(&self) -> &str {
        match self {
            Self::Direct(action) => action.action_name(),
            Self::LazySubCommand(action) => action.action_name(),
        }
    }
}

/// The primary, fallback and cache-key actions of one invocation.
#[derive(Debug, Clone)]
pub struct ActionSet {
    command: Action,
    fallback: Option<Action>,
    cache_key: Option<Action>,
}

impl ActionSet {
    pub fn new(command: Action, fallback: Option<Action>, cache_key: Option<Action>) -> Self {
        Self {
            command,
            fallback,
            cache_key,
        }
    }

    pub fn command(&self) -> &Action {
        &self.command
    }

    pub fn fallback(&self) -> Option<&Action> {
        self.fallback.as_ref()
    }

    pub fn cache_key(&self) -> Option<&Action> {
        self.cache_key.as_ref()
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}
