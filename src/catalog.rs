//! Handler catalog: the explicit registration table the dispatch table is
//! built from.
//!
//! Handler modules declare their members here at startup instead of being
//! discovered by runtime reflection. Each member is either an instance
//! method on a [`HandlerFactory`] type or a free function; both accept
//! exactly one `&mut RequestContext` parameter, a contract the registration
//! signatures enforce at compile time. A member may carry more than one
//! route declaration.
//!
//! ```rust,ignore
//! let mut catalog = HandlerCatalog::new();
//! catalog
//!     .handlers::<Pages>()
//!     .route("home_page", RouteMeta::new("/")?, Pages::home_page)
//!     .route("product_page", RouteMeta::new("/product/{id}")?, Pages::product_page);
//! catalog.function("api::double_handler", RouteMeta::new("/api/double/{val}")?, double_handler);
//! ```

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use crate::context::RequestContext;
use crate::error::RoutemapError;
use crate::meta::{CallSite, RouteMeta};
use crate::registry::{HandlerFactory, InstanceRegistry};

/// A route invocation target bound to its owning instance (or to nothing,
/// for static handlers).
pub type BoundHandler = Arc<dyn Fn(&mut RequestContext) + Send + Sync>;

/// How a descriptor produces its bound target during table construction.
///
/// Static members are bound at registration; instance members defer binding
/// until the builder resolves their owning instance.
pub(crate) enum HandlerBinding {
    Function(BoundHandler),
    Instance(Box<dyn Fn(&mut InstanceRegistry) -> Result<BoundHandler, RoutemapError>>),
}

impl HandlerBinding {
    pub(crate) fn bind(
        &self,
        registry: &mut InstanceRegistry,
    ) -> Result<BoundHandler, RoutemapError> {
        match self {
            HandlerBinding::Function(handler) => Ok(handler.clone()),
            HandlerBinding::Instance(bind) => bind(registry),
        }
    }
}

/// One registered handler member and its route declarations.
pub struct HandlerDescriptor {
    qualified_name: String,
    routes: Vec<RouteMeta>,
    is_static: bool,
    target_key: usize,
    pub(crate) binding: HandlerBinding,
}

impl HandlerDescriptor {
    /// Declaring type (or module) plus member name, e.g. `site::pages::Pages::home_page`.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// The member's route declarations, in declaration order. Never empty.
    #[must_use]
    pub fn routes(&self) -> &[RouteMeta] {
        &self.routes
    }

    /// Whether the member is a free function rather than an instance method.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.is_static
    }
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("qualified_name", &self.qualified_name)
            .field("routes", &self.routes)
            .field("is_static", &self.is_static)
            .finish()
    }
}

/// Registration table for route-carrying handler members.
///
/// Registrations are recorded in call order; [`HandlerCatalog::scan`]
/// validates the table and yields the descriptors the dispatch table builder
/// consumes. The first violation poisons the catalog and aborts the scan,
/// so a table is never built on top of a bad registration.
#[derive(Default)]
pub struct HandlerCatalog {
    members: Vec<HandlerDescriptor>,
    index: HashMap<String, usize>,
    conflict: Option<(String, CallSite)>,
}

impl HandlerCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a registration scope for the instance handler type `T`.
    pub fn handlers<T: HandlerFactory>(&mut self) -> TypeHandlers<'_, T> {
        TypeHandlers {
            catalog: self,
            _owner: PhantomData,
        }
    }

    /// Register a static (instance-free) handler function under an explicit
    /// qualified name. Registering the same name again with the same
    /// function appends the declaration to that member.
    pub fn function(
        &mut self,
        qualified_name: impl Into<String>,
        meta: RouteMeta,
        handler: fn(&mut RequestContext),
    ) -> &mut Self {
        self.record(qualified_name.into(), meta, true, handler as usize, || {
            HandlerBinding::Function(Arc::new(handler))
        });
        self
    }

    /// Validate the registration table and return the descriptors in
    /// registration order.
    ///
    /// Fails with a configuration error naming the offending member when a
    /// qualified name was registered against two different targets. Scan
    /// order is diagnostic only; table correctness depends solely on the
    /// `(order, pattern)` key uniqueness checked by the builder.
    pub fn scan(&self) -> Result<&[HandlerDescriptor], RoutemapError> {
        if let Some((detail, site)) = &self.conflict {
            return Err(RoutemapError::configuration(detail.clone(), Some(*site)));
        }
        debug!(member_count = self.members.len(), "handler catalog scanned");
        Ok(&self.members)
    }

    /// Number of registered members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn record(
        &mut self,
        qualified_name: String,
        meta: RouteMeta,
        is_static: bool,
        target_key: usize,
        binding: impl FnOnce() -> HandlerBinding,
    ) {
        // Abort-on-first-error: later registrations cannot mask the first
        // violation, they are simply ignored once the catalog is poisoned.
        if self.conflict.is_some() {
            return;
        }
        if let Some(&idx) = self.index.get(&qualified_name) {
            let member = &mut self.members[idx];
            if member.target_key != target_key {
                self.conflict = Some((
                    format!(
                        "handler member {qualified_name} is registered more than once \
                         with different targets"
                    ),
                    meta.site(),
                ));
                return;
            }
            member.routes.push(meta);
            return;
        }
        let idx = self.members.len();
        self.members.push(HandlerDescriptor {
            qualified_name: qualified_name.clone(),
            routes: vec![meta],
            is_static,
            target_key,
            binding: binding(),
        });
        self.index.insert(qualified_name, idx);
    }
}

/// Registration scope tying route declarations to instance methods of `T`.
///
/// The bound target is created at table-construction time as a closure over
/// the single shared instance the registry resolves for `T`.
pub struct TypeHandlers<'c, T: HandlerFactory> {
    catalog: &'c mut HandlerCatalog,
    _owner: PhantomData<fn(T)>,
}

impl<T: HandlerFactory> TypeHandlers<'_, T> {
    /// Register one instance method under `member`, carrying `meta`.
    /// Registering the same member again with the same method appends the
    /// declaration.
    pub fn route(self, member: &str, meta: RouteMeta, handler: fn(&T, &mut RequestContext)) -> Self {
        let qualified_name = format!("{}::{member}", type_name::<T>());
        self.catalog
            .record(qualified_name, meta, false, handler as usize, move || {
                HandlerBinding::Instance(Box::new(move |registry| {
                    let shared = registry.resolve::<T>()?;
                    Ok(Arc::new(move |cx: &mut RequestContext| handler(&shared, cx))
                        as BoundHandler)
                }))
            });
        self
    }
}
