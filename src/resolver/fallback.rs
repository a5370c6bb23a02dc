use super::CommandResolver;
use crate::action::{Action, LazyCommandAction, MethodExecutionAction};
use crate::config::MissingFallbackPolicy;
use crate::core::{CommandError, Result};
use crate::metadata::{CollapsedBatch, InvocationMetadata};

impl CommandResolver {
    /// Resolve the declared fallback of an invocation, if any.
    ///
    /// The fallback was linked with the parameter types of the primary
    /// method when the registry was built. A fallback that is itself a
    /// command becomes a lazy sub-command carrying `collapsed`; a plain one
    /// becomes a direct call.
    pub fn resolve_fallback(
        &self,
        metadata: &InvocationMetadata,
        collapsed: &CollapsedBatch,
    ) -> Result<Option<Action>> {
        let fallback = match metadata.method().fallback() {
            Ok(Some(method)) => method,
            Ok(None) => return Ok(None),
            Err(err @ CommandError::NoSuchFallbackMethod { .. })
                if self.config.missing_fallback == MissingFallbackPolicy::Ignore =>
            {
                log::warn!("Ignoring unresolved fallback: {}", err);
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        if !fallback.is_command() {
            return Ok(Some(Action::Direct(MethodExecutionAction::new(
                metadata.target().clone(),
                fallback,
                metadata.args().to_vec(),
            ))));
        }

        let nested = InvocationMetadata::builder()
            .target(metadata.target().clone())
            .method(fallback.clone())
            .args(metadata.args().to_vec())
            .collapser(metadata.collapser_annotation().cloned())
            .default_group_key(metadata.default_group_key())
            .default_command_key(fallback.name())
            .default_collapser_key(metadata.default_collapser_key())
            .build()?;

        Ok(Some(Action::LazySubCommand(LazyCommandAction::new(
            self.clone(),
            nested,
            collapsed.clone(),
        ))))
    }
}
