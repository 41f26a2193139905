//! # routemap
//!
//! **routemap** discovers route-carrying handler members declared across an
//! application's modules and wires them into a host router: declarative
//! route metadata in, a conflict-checked, priority-ordered dispatch table
//! out.
//!
//! ## Overview
//!
//! The pattern this crate serves: a website scatters its request handlers
//! across page and API modules, each member tagged with one or more route
//! declarations (pattern, allowed methods, priority order). At startup the
//! whole set is collected, validated, bound to shared handler instances,
//! conflict-checked, and published to the host's routing engine in one
//! atomic step. A misconfigured handler set prevents the service from
//! starting at all, with an error naming the exact offending member,
//! pattern, and source location, rather than starting with a silently
//! incomplete route set.
//!
//! ## Architecture
//!
//! The library is organized into a handful of small modules, built
//! bottom-up:
//!
//! - **[`meta`]** - immutable route declarations: pattern, method set,
//!   order, and declaration site (captured via `#[track_caller]`)
//! - **[`catalog`]** - the explicit registration table of handler members
//!   and the scan that validates it
//! - **[`registry`]** - one shared instance per handler-owning type,
//!   constructed on first use through its [`registry::HandlerFactory`] path
//! - **[`table`]** - the dispatch table builder: `(order, pattern)` keyed,
//!   duplicate-checked, published atomically to the host
//! - **[`router`]** - the host-facing [`router::RouteRegistrar`] capability
//!   and a reference router with order-aware matching
//! - **[`context`]** - the canonical request context handlers accept
//! - **[`report`]** - read-only introspection and the plain-text route
//!   report export
//! - **[`error`]** - the error taxonomy; everything except report-export
//!   failures is startup-fatal
//!
//! Construction runs once, synchronously, during process startup, strictly
//! before any request is served. The published table is immutable and safe
//! for unsynchronized concurrent reads; handler instances are shared
//! singletons, so any mutable state they carry must provide its own
//! synchronization (the demo site uses atomics for its render counters).
//!
//! ## Quick start
//!
//! ```rust
//! use routemap::{
//!     publish_table, HandlerCatalog, HandlerFactory, RequestContext, RouteMeta, Router,
//! };
//!
//! #[derive(Default)]
//! struct Pages;
//!
//! impl HandlerFactory for Pages {
//!     fn construct() -> anyhow::Result<Self> {
//!         Ok(Pages)
//!     }
//! }
//!
//! impl Pages {
//!     fn home(&self, cx: &mut RequestContext) {
//!         cx.response.set_html("<b>Home</b>");
//!     }
//! }
//!
//! # fn main() -> Result<(), routemap::RoutemapError> {
//! let mut catalog = HandlerCatalog::new();
//! catalog
//!     .handlers::<Pages>()
//!     .route("home", RouteMeta::new("/")?, Pages::home);
//!
//! let mut router = Router::new();
//! let table = publish_table(&catalog, &mut router)?;
//! assert_eq!(table.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod context;
pub mod error;
pub mod meta;
pub mod registry;
pub mod report;
pub mod router;
pub mod table;

pub use catalog::{BoundHandler, HandlerCatalog, HandlerDescriptor};
pub use context::{ParamVec, RequestContext, Response};
pub use error::{DeclarationRef, RoutemapError};
pub use meta::{CallSite, MethodSet, RouteMeta};
pub use registry::{HandlerFactory, InstanceRegistry};
pub use router::{RouteMatch, RouteRegistrar, RouteRegistration, Router};
pub use table::{publish_table, DispatchEntry, DispatchTable, RouteKey};
