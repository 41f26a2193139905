//! Dispatch table construction and the atomic publish to the host router.
//!
//! The builder is the central algorithm: it joins the catalog's descriptors,
//! the instance registry, and the bound invocation targets into a
//! conflict-checked mapping keyed by `(order, pattern)`, then hands every
//! entry to the host's route-registration capability in one pass. Nothing is
//! visible to the host until scanning, instance resolution, and
//! conflict-checking have all succeeded.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::catalog::{BoundHandler, HandlerCatalog};
use crate::context::RequestContext;
use crate::error::{DeclarationRef, RoutemapError};
use crate::meta::{CallSite, MethodSet};
use crate::registry::InstanceRegistry;
use crate::router::{RouteRegistrar, RouteRegistration};

/// Table key. Pattern alone is not unique: one pattern may be declared under
/// several orders to form primary/fallback chains.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteKey {
    pub order: u32,
    pub pattern: String,
}

/// One published route: key, allowed methods, bound invocation target, and
/// the declaration diagnostics copied from its route metadata.
pub struct DispatchEntry {
    key: RouteKey,
    methods: MethodSet,
    qualified_name: String,
    site: CallSite,
    handler: BoundHandler,
}

impl DispatchEntry {
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.key.pattern
    }

    #[must_use]
    pub fn order(&self) -> u32 {
        self.key.order
    }

    #[must_use]
    pub fn methods(&self) -> &MethodSet {
        &self.methods
    }

    /// Qualified name of the handler member this entry is bound to.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    #[must_use]
    pub fn site(&self) -> CallSite {
        self.site
    }

    #[must_use]
    pub fn handler(&self) -> &BoundHandler {
        &self.handler
    }

    /// Run the bound target against a request context.
    pub fn invoke(&self, cx: &mut RequestContext) {
        (self.handler.as_ref())(cx);
    }
}

impl fmt::Debug for DispatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchEntry")
            .field("order", &self.key.order)
            .field("pattern", &self.key.pattern)
            .field("methods", &self.methods)
            .field("qualified_name", &self.qualified_name)
            .field("site", &self.site)
            .finish()
    }
}

/// The immutable, conflict-free dispatch table.
///
/// Built completely or not at all; once built it is read-only and safe for
/// unsynchronized concurrent reads. Entries iterate in ascending
/// `(order, pattern)` order.
#[derive(Debug)]
pub struct DispatchTable {
    entries: BTreeMap<RouteKey, DispatchEntry>,
}

impl DispatchTable {
    /// Build the table from a catalog: scan, resolve instances, bind
    /// targets, and conflict-check every `(order, pattern)` key.
    ///
    /// Any configuration, instantiation, or duplicate-route error aborts the
    /// build; no partial table is returned.
    pub fn build(catalog: &HandlerCatalog) -> Result<Self, RoutemapError> {
        let descriptors = catalog.scan()?;
        let mut registry = InstanceRegistry::new();
        let mut entries: BTreeMap<RouteKey, DispatchEntry> = BTreeMap::new();

        for descriptor in descriptors {
            let handler = descriptor.binding.bind(&mut registry)?;
            for meta in descriptor.routes() {
                let key = RouteKey {
                    order: meta.order(),
                    pattern: meta.pattern().to_string(),
                };
                if let Some(existing) = entries.get(&key) {
                    return Err(RoutemapError::DuplicateRoute {
                        pattern: key.pattern,
                        order: key.order,
                        existing: DeclarationRef {
                            qualified_name: existing.qualified_name.clone(),
                            site: existing.site,
                        },
                        incoming: DeclarationRef {
                            qualified_name: descriptor.qualified_name().to_string(),
                            site: meta.site(),
                        },
                    });
                }
                let entry = DispatchEntry {
                    key: key.clone(),
                    methods: meta.methods().clone(),
                    qualified_name: descriptor.qualified_name().to_string(),
                    site: meta.site(),
                    handler: handler.clone(),
                };
                entries.insert(key, entry);
            }
        }

        info!(
            entry_count = entries.len(),
            instance_count = registry.len(),
            "dispatch table built"
        );
        Ok(DispatchTable { entries })
    }

    /// Hand every entry to the host's route-registration capability.
    ///
    /// Entries with order greater than 0 are registered with that explicit
    /// priority; order 0 registers at the host's default priority.
    pub fn publish(&self, registrar: &mut dyn RouteRegistrar) {
        for entry in self.entries.values() {
            let priority = (entry.order() > 0).then_some(entry.order());
            registrar.register(RouteRegistration {
                pattern: entry.pattern().to_string(),
                methods: entry.methods.clone(),
                priority,
                handler: entry.handler.clone(),
                qualified_name: entry.qualified_name.clone(),
            });
        }
        info!(
            entry_count = self.entries.len(),
            "dispatch table published to host router"
        );
    }

    /// Entries in ascending `(order, pattern)` order.
    pub fn entries(&self) -> impl Iterator<Item = &DispatchEntry> {
        self.entries.values()
    }

    /// Look up one entry by its table key.
    #[must_use]
    pub fn entry(&self, order: u32, pattern: &str) -> Option<&DispatchEntry> {
        self.entries.get(&RouteKey {
            order,
            pattern: pattern.to_string(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the table from `catalog` and, on success, publish every entry to
/// `registrar`. The returned [`Arc`] is the process-wide handle the
/// introspection component queries at runtime.
pub fn publish_table(
    catalog: &HandlerCatalog,
    registrar: &mut dyn RouteRegistrar,
) -> Result<Arc<DispatchTable>, RoutemapError> {
    let table = DispatchTable::build(catalog)?;
    table.publish(registrar);
    Ok(Arc::new(table))
}
