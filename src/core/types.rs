use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::Value;

/// Declared parameter type of a registered method.
///
/// Two methods with the same name but different parameter lists are
/// distinct registrations, so the parameter list is part of the lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamType {
    Integer,
    Float,
    Text,
    Boolean,
    List,
    /// Accepts any argument value.
    Any,
}

impl ParamType {
    /// Check whether an argument value may be passed for this parameter.
    ///
    /// `Null` is accepted everywhere, like a null reference.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (Self::Any, _) => true,
            (Self::Integer, Value::Integer(_)) => true,
            (Self::Float, Value::Float(_)) => true,
            (Self::Text, Value::Text(_)) => true,
            (Self::Boolean, Value::Boolean(_)) => true,
            (Self::List, Value::List(_)) => true,
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Float => "FLOAT",
            Self::Text => "TEXT",
            Self::Boolean => "BOOLEAN",
            Self::List => "LIST",
            Self::Any => "ANY",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Render a parameter list as `INTEGER, TEXT` for error messages.
pub fn format_signature(parameter_types: &[ParamType]) -> String {
    parameter_types
        .iter()
        .map(ParamType::name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// What a registered method hands back to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReturnKind {
    /// A plain value, available when the call returns.
    #[default]
    Value,
    /// A deferred value the caller waits on.
    Future,
    /// A stream of values.
    Stream,
}

/// How the execution engine should run the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecutionType {
    #[default]
    Synchronous,
    Asynchronous,
    Observable,
}

impl ExecutionType {
    pub fn from_return_kind(kind: ReturnKind) -> Self {
        match kind {
            ReturnKind::Value => Self::Synchronous,
            ReturnKind::Future => Self::Asynchronous,
            ReturnKind::Stream => Self::Observable,
        }
    }
}

impl From<ReturnKind> for ExecutionType {
    fn from(kind: ReturnKind) -> Self {
        Self::from_return_kind(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_accepted_by_every_param_type() {
        for param in [
            ParamType::Integer,
            ParamType::Float,
            ParamType::Text,
            ParamType::Boolean,
            ParamType::List,
            ParamType::Any,
        ] {
            assert!(param.accepts(&Value::Null), "{param} rejected NULL");
        }
    }

    #[test]
    fn test_param_type_rejects_other_kinds() {
        assert!(ParamType::Float.accepts(&Value::Float(9.5)));
        assert!(!ParamType::Float.accepts(&Value::Integer(9)));
        assert!(!ParamType::Text.accepts(&Value::Boolean(true)));
        assert!(ParamType::Any.accepts(&Value::Text("x".into())));
    }

    #[test]
    fn test_execution_type_follows_return_kind() {
        assert_eq!(ExecutionType::from(ReturnKind::Value), ExecutionType::Synchronous);
        assert_eq!(ExecutionType::from(ReturnKind::Future), ExecutionType::Asynchronous);
        assert_eq!(ExecutionType::from(ReturnKind::Stream), ExecutionType::Observable);
    }

    #[test]
    fn test_format_signature() {
        assert_eq!(format_signature(&[]), "");
        assert_eq!(
            format_signature(&[ParamType::Integer, ParamType::Text]),
            "INTEGER, TEXT"
        );
    }
}
