//! Turns invocation metadata into a command description for the engine.

mod description;
mod fallback;

pub use description::{CommandDescription, CommandSetter};

use std::fmt;
use std::sync::Arc;
use tracing::{Level, event, info_span};

use crate::action::{Action, ActionSet, MethodExecutionAction};
use crate::config::ResolverConfig;
use crate::core::{CommandError, Result};
use crate::engine::ExecutionEngine;
use crate::metadata::{CollapsedBatch, InvocationMetadata};
use crate::properties::{CommandProperties, map_thread_pool_properties};
use crate::registry::MethodRegistry;

/// Resolves command descriptions against a frozen method registry.
///
/// Cloning is cheap and every clone shares the same registry and engine.
/// Resolution holds no mutable state, so one resolver may serve any number
/// of threads at once.
#[derive(Clone)]
pub struct CommandResolver {
    registry: Arc<MethodRegistry>,
    engine: Arc<dyn ExecutionEngine>,
    config: ResolverConfig,
}

impl CommandResolver {
    pub fn new(registry: Arc<MethodRegistry>, engine: Arc<dyn ExecutionEngine>) -> Self {
        Self::with_config(registry, engine, ResolverConfig::default())
    }

    pub fn with_config(
        registry: Arc<MethodRegistry>,
        engine: Arc<dyn ExecutionEngine>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            registry,
            engine,
            config,
        }
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &dyn ExecutionEngine {
        self.engine.as_ref()
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve the full description of one invocation.
    ///
    /// Explicit group and command keys win over the metadata defaults.
    /// Nothing is executed here; a protected fallback is only wrapped.
    pub fn resolve(
        &self,
        metadata: &InvocationMetadata,
        collapsed: &CollapsedBatch,
    ) -> Result<CommandDescription> {
        let span = info_span!(
            "command.resolve",
            owner = metadata.target().short_type_name(),
            method = %metadata.method().name(),
            batch = collapsed.len()
        );
        let _enter = span.enter();

        let command = metadata
            .command_annotation()
            .ok_or_else(|| CommandError::MissingAnnotation(metadata.method().signature().to_string()))?;

        let group_key = non_empty_or(&command.group_key, metadata.default_group_key());
        let command_key = non_empty_or(&command.command_key, metadata.default_command_key());

        if self.config.detect_cyclic_fallbacks {
            if let Some(chain) = metadata.method().fallback_cycle() {
                return Err(CommandError::CyclicFallback(chain.to_vec()));
            }
        }

        let setter = CommandSetter {
            group_key: group_key.to_string(),
            command_key: command_key.to_string(),
            thread_pool_key: command.thread_pool_key.clone(),
            thread_pool_properties: map_thread_pool_properties(&command.thread_pool_properties)?,
        };
        let command_properties = CommandProperties::from_entries(&command.command_properties);
        let actions = self.build_action_set(metadata, collapsed)?;

        event!(
            Level::DEBUG,
            group_key = %setter.group_key,
            command_key = %setter.command_key,
            fallback = actions.has_fallback(),
            cache_key = actions.cache_key().is_some(),
            "command resolved"
        );

        Ok(CommandDescription::new(
            setter,
            actions,
            command_properties,
            command.ignore_exceptions.clone(),
            metadata.execution_type(),
        ))
    }

    /// Compose the primary, fallback and cache-key actions.
    pub fn build_action_set(
        &self,
        metadata: &InvocationMetadata,
        collapsed: &CollapsedBatch,
    ) -> Result<ActionSet> {
        let command = Action::Direct(MethodExecutionAction::new(
            metadata.target().clone(),
            metadata.method().clone(),
            metadata.args().to_vec(),
        ));
        let fallback = self.resolve_fallback(metadata, collapsed)?;
        let cache_key = metadata.cache_key_method().map(|method| {
            Action::Direct(MethodExecutionAction::new(
                metadata.target().clone(),
                method.clone(),
                metadata.args().to_vec(),
            ))
        });
        Ok(ActionSet::new(command, fallback, cache_key))
    }
}

impl fmt::Debug for CommandResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandResolver")
            .field("registered_methods", &self.registry.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

pub(crate) fn non_empty_or<'a>(declared: &'a str, default: &'a str) -> &'a str {
    if declared.is_empty() { default } else { declared }
}
