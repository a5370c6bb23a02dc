// ============================================================================
// circuitcmd Library
// ============================================================================

pub mod core;
pub mod annotation;
pub mod registry;
pub mod metadata;
pub mod properties;
pub mod action;
pub mod resolver;
pub mod engine;
pub mod config;

// Re-export main types for convenience
pub use crate::core::{CommandError, ExecutionType, ParamType, Result, ReturnKind, Value};
pub use crate::annotation::{CollapserAnnotation, CollapserScope, CommandAnnotation, PropertyEntry};
pub use crate::registry::{MethodHandle, MethodRegistry, MethodSignature, MethodSpec, ServiceTarget};
pub use crate::metadata::{CollapsedBatch, CollapsedRequest, InvocationMetadata};
pub use crate::properties::{CommandProperties, ThreadPoolProperties, ThreadPoolPropertyKey};
pub use crate::action::{Action, ActionSet, CommandAction, LazyCommandAction, MethodExecutionAction};
pub use crate::resolver::{CommandDescription, CommandResolver, CommandSetter};
pub use crate::engine::ExecutionEngine;
pub use crate::config::{MissingFallbackPolicy, ResolverConfig};
