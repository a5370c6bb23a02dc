//! Startup registration of invocable methods.
//!
//! Every method that can be a primary command, a fallback or a cache-key
//! provider is registered once, up front, under its owning type, name and
//! parameter list. The registry is frozen by [`MethodRegistryBuilder::build`]
//! and shared read-only afterwards. Freezing also links every command to its
//! declared fallback, so resolution follows handles and never searches by
//! name at call time.

mod target;

pub use target::ServiceTarget;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock, Weak};

use crate::annotation::{CollapserAnnotation, CommandAnnotation};
use crate::core::{CommandError, ParamType, Result, ReturnKind, Value, format_signature};

/// Type-erased method body. The first argument is the target instance.
pub type MethodBody =
    Arc<dyn Fn(&(dyn Any + Send + Sync), &[Value]) -> Result<Value> + Send + Sync>;

/// Lookup key for a registered method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub owner: &'static str,
    pub name: String,
    pub parameter_types: Vec<ParamType>,
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}({})",
            self.owner,
            self.name,
            format_signature(&self.parameter_types)
        )
    }
}

/// Declaration half of a registration: everything except the body.
#[derive(Debug, Clone)]
pub struct MethodSpec {
    name: String,
    parameter_types: Vec<ParamType>,
    return_kind: ReturnKind,
    command: Option<CommandAnnotation>,
    collapser: Option<CollapserAnnotation>,
}

impl MethodSpec {
    pub fn new(name: &str, parameter_types: &[ParamType]) -> Self {
        Self {
            name: name.to_string(),
            parameter_types: parameter_types.to_vec(),
            return_kind: ReturnKind::Value,
            command: None,
            collapser: None,
        }
    }

    /// Mark the method as a protected command.
    pub fn command(mut self, annotation: CommandAnnotation) -> Self {
        self.command = Some(annotation);
        self
    }

    pub fn collapser(mut self, annotation: CollapserAnnotation) -> Self {
        self.collapser = Some(annotation);
        self
    }

    pub fn returns(mut self, kind: ReturnKind) -> Self {
        self.return_kind = kind;
        self
    }
}

/// Fallback of a command, linked once when the registry is frozen.
enum FallbackLink {
    Undeclared,
    Linked {
        handle: Weak<MethodHandle>,
        /// Command keys along the chain, set when it loops back on itself.
        cycle: Option<Vec<String>>,
    },
    Missing(CommandError),
}

/// A registered, directly invocable method.
pub struct MethodHandle {
    signature: MethodSignature,
    return_kind: ReturnKind,
    command: Option<CommandAnnotation>,
    collapser: Option<CollapserAnnotation>,
    body: MethodBody,
    fallback: OnceLock<FallbackLink>,
}

impl MethodHandle {
    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    pub fn owner(&self) -> &'static str {
        self.signature.owner
    }

    pub fn name(&self) -> &str {
        &self.signature.name
    }

    pub fn parameter_types(&self) -> &[ParamType] {
        &self.signature.parameter_types
    }

    pub fn arity(&self) -> usize {
        self.signature.parameter_types.len()
    }

    pub fn return_kind(&self) -> ReturnKind {
        self.return_kind
    }

    pub fn command_annotation(&self) -> Option<&CommandAnnotation> {
        self.command.as_ref()
    }

    pub fn collapser_annotation(&self) -> Option<&CollapserAnnotation> {
        self.collapser.as_ref()
    }

    /// Whether the method is itself a protected command.
    pub fn is_command(&self) -> bool {
        self.command.is_some()
    }

    /// The declared fallback, as linked when the registry was frozen.
    ///
    /// `Ok(None)` when no fallback is declared. A declared name with no
    /// method of the same parameter types yields `NoSuchFallbackMethod`.
    pub fn fallback(&self) -> Result<Option<Arc<MethodHandle>>> {
        match self.fallback.get() {
            None | Some(FallbackLink::Undeclared) => Ok(None),
            Some(FallbackLink::Missing(err)) => Err(err.clone()),
            Some(FallbackLink::Linked { handle, .. }) => handle.upgrade().map(Some).ok_or_else(|| {
                CommandError::InvalidMetadata(format!(
                    "fallback of '{}' belongs to a dropped registry",
                    self.signature
                ))
            }),
        }
    }

    /// Command keys of the fallback chain starting here, if it is cyclic.
    pub fn fallback_cycle(&self) -> Option<&[String]> {
        match self.fallback.get() {
            Some(FallbackLink::Linked {
                cycle: Some(chain), ..
            }) => Some(chain.as_slice()),
            _ => None,
        }
    }

    /// Check an argument list against the declared parameters.
    pub fn check_args(&self, args: &[Value]) -> Result<()> {
        if args.len() != self.arity() {
            return Err(CommandError::InvalidMetadata(format!(
                "method '{}' takes {} argument(s), got {}",
                self.signature,
                self.arity(),
                args.len()
            )));
        }
        for (idx, (param, arg)) in self.parameter_types().iter().zip(args).enumerate() {
            if !param.accepts(arg) {
                return Err(CommandError::InvalidMetadata(format!(
                    "argument {} of '{}' expects {}, got {}",
                    idx,
                    self.signature,
                    param,
                    arg.type_name()
                )));
            }
        }
        Ok(())
    }

    /// Call the method on `target`.
    pub fn invoke(&self, target: &ServiceTarget, args: &[Value]) -> Result<Value> {
        if target.type_name() != self.owner() {
            return Err(CommandError::ExecutionError(format!(
                "Method '{}' cannot be invoked on an instance of '{}'",
                self.signature,
                target.type_name()
            )));
        }
        if args.len() != self.arity() {
            return Err(CommandError::ExecutionError(format!(
                "Method '{}' expects {} argument(s), got {}",
                self.signature,
                self.arity(),
                args.len()
            )));
        }
        (self.body)(target.instance(), args)
    }
}

impl fmt::Debug for MethodHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodHandle")
            .field("signature", &self.signature)
            .field("return_kind", &self.return_kind)
            .field("command", &self.command)
            .field("collapser", &self.collapser)
            .finish_non_exhaustive()
    }
}

/// Frozen set of registered methods.
#[derive(Debug, Default)]
pub struct MethodRegistry {
    methods: HashMap<MethodSignature, Arc<MethodHandle>>,
}

impl MethodRegistry {
    pub fn builder() -> MethodRegistryBuilder {
        MethodRegistryBuilder::new()
    }

    /// Find a method by owner, name and exact parameter list.
    pub fn find(
        &self,
        owner: &'static str,
        name: &str,
        parameter_types: &[ParamType],
    ) -> Option<Arc<MethodHandle>> {
        let key = MethodSignature {
            owner,
            name: name.to_string(),
            parameter_types: parameter_types.to_vec(),
        };
        self.methods.get(&key).cloned()
    }

    /// Typed variant of [`MethodRegistry::find`].
    pub fn find_on<T: Any>(
        &self,
        name: &str,
        parameter_types: &[ParamType],
    ) -> Option<Arc<MethodHandle>> {
        self.find(std::any::type_name::<T>(), name, parameter_types)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

#[derive(Default)]
pub struct MethodRegistryBuilder {
    methods: HashMap<MethodSignature, Arc<MethodHandle>>,
    duplicates: Vec<MethodSignature>,
}

impl MethodRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start registering methods owned by `T`.
    pub fn service<T: Any + Send + Sync>(self) -> ServiceRegistration<T> {
        ServiceRegistration {
            builder: self,
            _owner: PhantomData,
        }
    }

    fn insert(&mut self, handle: MethodHandle) {
        let signature = handle.signature.clone();
        if self.methods.contains_key(&signature) {
            self.duplicates.push(signature);
            return;
        }
        self.methods.insert(signature, Arc::new(handle));
    }

    /// Freeze the registry and link every command to its fallback.
    ///
    /// Fails if any signature was registered twice. Unregistered fallbacks
    /// and cyclic chains are recorded on the handle and reported when the
    /// command is resolved.
    pub fn build(self) -> Result<MethodRegistry> {
        if let Some(duplicate) = self.duplicates.first() {
            return Err(CommandError::DuplicateMethod(duplicate.to_string()));
        }
        for handle in self.methods.values() {
            // each handle is linked exactly once, here
            let _ = handle.fallback.set(link_fallback(&self.methods, handle));
        }
        let cyclic = self
            .methods
            .values()
            .filter(|handle| handle.fallback_cycle().is_some())
            .count();
        log::debug!(
            "Method registry frozen with {} method(s), {} cyclic fallback chain(s)",
            self.methods.len(),
            cyclic
        );
        Ok(MethodRegistry {
            methods: self.methods,
        })
    }
}

type MethodTable = HashMap<MethodSignature, Arc<MethodHandle>>;

/// Signature of a method on the same owner with the same parameters.
fn sibling(handle: &MethodHandle, name: &str) -> MethodSignature {
    MethodSignature {
        owner: handle.owner(),
        name: name.to_string(),
        parameter_types: handle.signature.parameter_types.clone(),
    }
}

fn link_fallback(methods: &MethodTable, handle: &MethodHandle) -> FallbackLink {
    let Some(name) = handle
        .command
        .as_ref()
        .map(|annotation| annotation.fallback_method.as_str())
        .filter(|name| !name.is_empty())
    else {
        return FallbackLink::Undeclared;
    };

    match methods.get(&sibling(handle, name)) {
        Some(fallback) => FallbackLink::Linked {
            handle: Arc::downgrade(fallback),
            cycle: fallback_cycle(methods, handle),
        },
        None => {
            let mut available: Vec<String> = methods
                .keys()
                .filter(|signature| signature.owner == handle.owner() && signature.name == name)
                .map(ToString::to_string)
                .collect();
            available.sort();
            FallbackLink::Missing(CommandError::NoSuchFallbackMethod {
                owner: handle.owner().to_string(),
                method: name.to_string(),
                signature: format_signature(handle.parameter_types()),
                available,
            })
        }
    }
}

fn command_key(annotation: &CommandAnnotation, method: &MethodHandle) -> String {
    if annotation.command_key.is_empty() {
        method.name().to_string()
    } else {
        annotation.command_key.clone()
    }
}

/// Walk the protected fallbacks from `start`, returning the command keys
/// visited if one repeats. A plain or unregistered link ends the chain.
fn fallback_cycle(methods: &MethodTable, start: &MethodHandle) -> Option<Vec<String>> {
    let annotation = start.command.as_ref()?;
    let mut visited = vec![command_key(annotation, start)];
    let mut next = annotation.fallback_method.clone();

    while !next.is_empty() {
        let method = methods.get(&sibling(start, &next))?;
        let annotation = method.command.as_ref()?;
        let key = command_key(annotation, method);
        let repeated = visited.contains(&key);
        visited.push(key);
        if repeated {
            return Some(visited);
        }
        next = annotation.fallback_method.clone();
    }
    None
}

/// Registration scope for the methods of one service type.
pub struct ServiceRegistration<T> {
    builder: MethodRegistryBuilder,
    _owner: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> ServiceRegistration<T> {
    pub fn method<F>(mut self, spec: MethodSpec, body: F) -> Self
    where
        F: Fn(&T, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let owner = std::any::type_name::<T>();
        let erased: MethodBody = Arc::new(move |instance: &(dyn Any + Send + Sync), args: &[Value]| {
            let target = instance.downcast_ref::<T>().ok_or_else(|| {
                CommandError::ExecutionError(format!("target is not an instance of '{}'", owner))
            })?;
            body(target, args)
        });
        self.builder.insert(MethodHandle {
            signature: MethodSignature {
                owner,
                name: spec.name,
                parameter_types: spec.parameter_types,
            },
            return_kind: spec.return_kind,
            command: spec.command,
            collapser: spec.collapser,
            body: erased,
            fallback: OnceLock::new(),
        });
        self
    }

    /// Finish this service and continue with the registry builder.
    pub fn done(self) -> MethodRegistryBuilder {
        self.builder
    }

    pub fn build(self) -> Result<MethodRegistry> {
        self.builder.build()
    }
}
