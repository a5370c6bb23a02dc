//! Everything the interceptor captured about one call site.

mod collapsed;

pub use collapsed::{CollapsedBatch, CollapsedRequest};

use std::sync::Arc;

use crate::annotation::{CollapserAnnotation, CommandAnnotation};
use crate::core::{CommandError, ExecutionType, ParamType, Result, Value};
use crate::registry::{MethodHandle, ServiceTarget};

/// Immutable description of a single invocation.
///
/// Built through [`InvocationMetadata::builder`], which checks that the
/// arguments fit the method and fills in default keys when the caller did
/// not compute them.
#[derive(Debug, Clone)]
pub struct InvocationMetadata {
    target: ServiceTarget,
    method: Arc<MethodHandle>,
    args: Vec<Value>,
    command: Option<CommandAnnotation>,
    collapser: Option<CollapserAnnotation>,
    default_group_key: String,
    default_command_key: String,
    default_collapser_key: String,
    cache_key_method: Option<Arc<MethodHandle>>,
    execution_type: ExecutionType,
}

impl InvocationMetadata {
    pub fn builder() -> InvocationMetadataBuilder {
        InvocationMetadataBuilder::default()
    }

    /// Metadata for a call, taking annotations and keys from the method.
    pub fn for_call(
        target: ServiceTarget,
        method: Arc<MethodHandle>,
        args: Vec<Value>,
    ) -> Result<Self> {
        Self::builder().target(target).method(method).args(args).build()
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

    pub fn parameter_types(&self) -> &[ParamType] {
        self.method.parameter_types()
    }

    pub fn command_annotation(&self) -> Option<&CommandAnnotation> {
        self.command.as_ref()
    }

    pub fn collapser_annotation(&self) -> Option<&CollapserAnnotation> {
        self.collapser.as_ref()
    }

    pub fn default_group_key(&self) -> &str {
        &self.default_group_key
    }

    pub fn default_command_key(&self) -> &str {
        &self.default_command_key
    }

    pub fn default_collapser_key(&self) -> &str {
        &self.default_collapser_key
    }

    pub fn cache_key_method(&self) -> Option<&Arc<MethodHandle>> {
        self.cache_key_method.as_ref()
    }

    pub fn execution_type(&self) -> ExecutionType {
        self.execution_type
    }

    /// Same invocation with a different argument list.
    pub fn with_args(&self, args: Vec<Value>) -> Result<Self> {
        self.method.check_args(&args)?;
        Ok(Self {
            args,
            ..self.clone()
        })
    }
}

#[derive(Debug, Default)]
pub struct InvocationMetadataBuilder {
    target: Option<ServiceTarget>,
    method: Option<Arc<MethodHandle>>,
    args: Vec<Value>,
    collapser: Option<Option<CollapserAnnotation>>,
    default_group_key: Option<String>,
    default_command_key: Option<String>,
    default_collapser_key: Option<String>,
    cache_key_method: Option<Arc<MethodHandle>>,
    execution_type: Option<ExecutionType>,
}

impl InvocationMetadataBuilder {
    pub fn target(mut self, target: ServiceTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn method(mut self, method: Arc<MethodHandle>) -> Self {
        self.method = Some(method);
        self
    }

    pub fn args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    /// Declared collapser annotation. Defaults to the one registered on the method.
    pub fn collapser(mut self, annotation: Option<CollapserAnnotation>) -> Self {
        self.collapser = Some(annotation);
        self
    }

    pub fn default_group_key(mut self, key: &str) -> Self {
        self.default_group_key = Some(key.to_string());
        self
    }

    pub fn default_command_key(mut self, key: &str) -> Self {
        self.default_command_key = Some(key.to_string());
        self
    }

    pub fn default_collapser_key(mut self, key: &str) -> Self {
        self.default_collapser_key = Some(key.to_string());
        self
    }

    pub fn cache_key_method(mut self, method: Arc<MethodHandle>) -> Self {
        self.cache_key_method = Some(method);
        self
    }

    pub fn execution_type(mut self, execution_type: ExecutionType) -> Self {
        self.execution_type = Some(execution_type);
        self
    }

    pub fn build(self) -> Result<InvocationMetadata> {
        let target = self
            .target
            .ok_or_else(|| CommandError::InvalidMetadata("target is required".to_string()))?;
        let method = self
            .method
            .ok_or_else(|| CommandError::InvalidMetadata("method is required".to_string()))?;

        check_owner(&target, &method)?;
        method.check_args(&self.args)?;
        if let Some(cache_key) = &self.cache_key_method {
            check_owner(&target, cache_key)?;
            cache_key.check_args(&self.args)?;
        }

        let default_group_key = non_empty(self.default_group_key)
            .unwrap_or_else(|| target.short_type_name().to_string());
        let default_command_key =
            non_empty(self.default_command_key).unwrap_or_else(|| method.name().to_string());
        let default_collapser_key =
            non_empty(self.default_collapser_key).unwrap_or_else(|| method.name().to_string());

        // fallback links are computed from the registered annotation
        let command = method.command_annotation().cloned();
        let collapser = self
            .collapser
            .unwrap_or_else(|| method.collapser_annotation().cloned());
        let execution_type = self
            .execution_type
            .unwrap_or_else(|| ExecutionType::from_return_kind(method.return_kind()));

        Ok(InvocationMetadata {
            target,
            method,
            args: self.args,
            command,
            collapser,
            default_group_key,
            default_command_key,
            default_collapser_key,
            cache_key_method: self.cache_key_method,
            execution_type,
        })
    }
}

fn non_empty(key: Option<String>) -> Option<String> {
    key.filter(|key| !key.is_empty())
}

fn check_owner(target: &ServiceTarget, method: &MethodHandle) -> Result<()> {
    if target.type_name() != method.owner() {
        return Err(CommandError::InvalidMetadata(format!(
            "method '{}' does not belong to '{}'",
            method.signature(),
            target.type_name()
        )));
    }
    Ok(())
}
