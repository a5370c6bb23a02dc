use crate::action::ActionSet;
use crate::core::ExecutionType;
use crate::properties::{CommandProperties, ThreadPoolProperties};

/// Identity and thread pool settings of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSetter {
    pub group_key: String,
    pub command_key: String,
    /// Empty means the engine picks the pool by command key.
    pub thread_pool_key: String,
    pub thread_pool_properties: Option<ThreadPoolProperties>,
}

/// Fully resolved configuration handed to the execution engine.
///
/// Built in one step from all of its parts and never modified afterwards.
#[derive(Debug, Clone)]
pub struct CommandDescription {
    setter: CommandSetter,
    actions: ActionSet,
    command_properties: CommandProperties,
    ignore_exceptions: Vec<String>,
    execution_type: ExecutionType,
}

impl CommandDescription {
    pub fn new(
        setter: CommandSetter,
        actions: ActionSet,
        command_properties: CommandProperties,
        ignore_exceptions: Vec<String>,
        execution_type: ExecutionType,
    ) -> Self {
        Self {
            setter,
            actions,
            command_properties,
            ignore_exceptions,
            execution_type,
        }
    }

    pub fn setter(&self) -> &CommandSetter {
        &self.setter
    }

    pub fn group_key(&self) -> &str {
        &self.setter.group_key
    }

    pub fn command_key(&self) -> &str {
        &self.setter.command_key
    }

    pub fn thread_pool_key(&self) -> &str {
        &self.setter.thread_pool_key
    }

    /// Pool key the engine should use: the declared one, else the command key.
    pub fn effective_thread_pool_key(&self) -> &str {
        if self.setter.thread_pool_key.is_empty() {
            self.setter.command_key.as_str()
        } else {
            self.setter.thread_pool_key.as_str()
        }
    }

    pub fn thread_pool_properties(&self) -> Option<&ThreadPoolProperties> {
        self.setter.thread_pool_properties.as_ref()
    }

    pub fn command_properties(&self) -> &CommandProperties {
        &self.command_properties
    }

    pub fn actions(&self) -> &ActionSet {
        &self.actions
    }

    pub fn ignore_exceptions(&self) -> &[String] {
        &self.ignore_exceptions
    }

    pub fn execution_type(&self) -> ExecutionType {
        self.execution_type
    }

    pub fn into_actions(self) -> ActionSet {
        self.actions
    }
}
