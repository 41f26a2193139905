//! Shared-instance registry for handler-owning types.
//!
//! Instance handler methods need an owning value to be bound against. The
//! registry guarantees that each declaring type is constructed exactly once
//! per table-construction pass, no matter how many of its methods carry
//! route declarations; every binding for that type shares the same
//! [`Arc`]. Static handlers never touch the registry.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::RoutemapError;

/// The no-argument construction path for a handler-owning type.
///
/// The dispatch table builder calls [`HandlerFactory::construct`] the first
/// time a type is needed; a failure aborts the whole build as an
/// instantiation error naming the type.
pub trait HandlerFactory: Send + Sync + 'static {
    fn construct() -> anyhow::Result<Self>
    where
        Self: Sized;
}

/// Per-build-pass cache mapping a declaring type to its single shared
/// instance. Not reused across builds.
#[derive(Default)]
pub struct InstanceRegistry {
    instances: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl InstanceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the shared instance for `T`, constructing it on first use.
    ///
    /// Every call after the first returns the previously constructed
    /// instance, never a new one.
    pub fn resolve<T: HandlerFactory>(&mut self) -> Result<Arc<T>, RoutemapError> {
        let type_id = TypeId::of::<T>();
        if let Some(existing) = self.instances.get(&type_id) {
            let shared = existing
                .clone()
                .downcast::<T>()
                .expect("instance registry entry keyed under the wrong TypeId");
            return Ok(shared);
        }

        let constructed = T::construct().map_err(|source| RoutemapError::Instantiation {
            type_name: type_name::<T>(),
            source,
        })?;
        let shared = Arc::new(constructed);
        self.instances
            .insert(type_id, shared.clone() as Arc<dyn Any + Send + Sync>);
        debug!(
            handler_type = type_name::<T>(),
            resolved_types = self.instances.len(),
            "handler instance constructed"
        );
        Ok(shared)
    }

    /// Number of distinct types constructed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
