use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared reference to the instance a method is invoked on.
#[derive(Clone)]
pub struct ServiceTarget {
    type_name: &'static str,
    instance: Arc<dyn Any + Send + Sync>,
}

impl ServiceTarget {
    pub fn new<T: Any + Send + Sync>(instance: Arc<T>) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            instance,
        }
    }

    /// Fully qualified type name, as used for registry lookups.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Last path segment of the type name, e.g. `PaymentService`.
    pub fn short_type_name(&self) -> &'static str {
        let base = self.type_name.split('<').next().unwrap_or(self.type_name);
        base.rsplit("::").next().unwrap_or(base)
    }

    pub fn instance(&self) -> &(dyn Any + Send + Sync) {
        self.instance.as_ref()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.instance.downcast_ref::<T>()
    }

    /// Whether both references point at the same instance.
    pub fn same_instance(&self, other: &ServiceTarget) -> bool {
        Arc::ptr_eq(&self.instance, &other.instance)
    }
}

impl fmt::Debug for ServiceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceTarget")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
