//! Reference host router and the registration capability it exposes.

use http::{Extensions, Method};
use regex::Regex;
use smallvec::smallvec;
use tracing::{debug, info, warn};

use crate::catalog::BoundHandler;
use crate::context::{ParamVec, RequestContext};
use crate::meta::MethodSet;

/// One registration handed to the host during the dispatch table's atomic
/// publish: the route pattern, its allowed methods, the explicit priority
/// (absent for default-order entries), the bound invocation target, and the
/// handler's qualified name for diagnostics.
pub struct RouteRegistration {
    pub pattern: String,
    pub methods: MethodSet,
    pub priority: Option<u32>,
    pub handler: BoundHandler,
    pub qualified_name: String,
}

/// The route-registration capability a host router exposes.
///
/// The dispatch table performs one [`RouteRegistrar::register`] call per
/// entry after construction has fully succeeded; a registrar never sees a
/// partial table.
pub trait RouteRegistrar {
    fn register(&mut self, registration: RouteRegistration);
}

struct CompiledRoute {
    pattern: String,
    regex: Regex,
    param_names: Vec<String>,
    methods: MethodSet,
    priority: u32,
    handler: BoundHandler,
    qualified_name: String,
}

/// Result of matching a request path against the registered routes.
pub struct RouteMatch<'r> {
    /// The matched route pattern.
    pub pattern: &'r str,
    /// Effective priority the route was registered at (0 = host default).
    pub priority: u32,
    /// Qualified name of the bound handler.
    pub qualified_name: &'r str,
    /// Path parameters extracted from the URL.
    pub path_params: ParamVec,
    handler: &'r BoundHandler,
}

impl RouteMatch<'_> {
    /// Run the matched handler against a request context.
    pub fn invoke(&self, cx: &mut RequestContext) {
        (self.handler.as_ref())(cx);
    }
}

/// Reference host router.
///
/// Routes are kept sorted by (priority, registration sequence), so matching
/// is a linear scan that naturally prefers lower-order entries when several
/// patterns could match the same request. Registration happens once at
/// startup; matching is read-only afterwards.
#[derive(Default)]
pub struct Router {
    routes: Vec<CompiledRoute>,
    services: Extensions,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a service available to handlers through
    /// [`RequestContext::service`]. Used by the demo site to hand the
    /// published dispatch table to its introspection page.
    pub fn provide<T: Clone + Send + Sync + 'static>(&mut self, service: T) {
        self.services.insert(service);
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Match a request to a route.
    ///
    /// Tests routes in ascending priority order and returns the first whose
    /// method set and compiled pattern both match, with extracted path
    /// parameters.
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        debug!(method = %method, path = %path, "route match attempt");

        for route in &self.routes {
            if !route.methods.contains(method) {
                continue;
            }
            let Some(captures) = route.regex.captures(path) else {
                continue;
            };
            let mut path_params: ParamVec = smallvec![];
            for (i, name) in route.param_names.iter().enumerate() {
                if let Some(value) = captures.get(i + 1) {
                    path_params.push((name.clone(), value.as_str().to_string()));
                }
            }
            info!(
                method = %method,
                path = %path,
                route_pattern = %route.pattern,
                priority = route.priority,
                handler = %route.qualified_name,
                "route matched"
            );
            return Some(RouteMatch {
                pattern: &route.pattern,
                priority: route.priority,
                qualified_name: &route.qualified_name,
                path_params,
                handler: &route.handler,
            });
        }

        warn!(method = %method, path = %path, "no route matched");
        None
    }

    /// Match and run a request in one step, filling the context's path
    /// parameters and service extensions before invoking the handler.
    ///
    /// Returns `false` when no route matches (the host would answer 404).
    pub fn dispatch(&self, cx: &mut RequestContext) -> bool {
        let Some(matched) = self.route(&cx.method, &cx.path) else {
            return false;
        };
        let RouteMatch {
            path_params,
            handler,
            ..
        } = matched;
        cx.path_params = path_params;
        cx.extensions = self.services.clone();
        (handler.as_ref())(cx);
        true
    }

    /// Convert a route pattern to an anchored regex and its parameter names.
    ///
    /// `{name}` segments match one non-empty path segment. A `:constraint`
    /// suffix inside the braces is host syntax and only the name is kept; a
    /// trailing `?` marks the segment optional (`/api/double/{val:int?}`
    /// matches both `/api/double` and `/api/double/21`).
    pub(crate) fn path_to_regex(pattern: &str) -> (Regex, Vec<String>) {
        if pattern == "/" {
            return (
                Regex::new(r"^/$").expect("failed to compile route pattern regex"),
                Vec::new(),
            );
        }

        let mut regex_src = String::with_capacity(pattern.len() + 8);
        regex_src.push('^');
        let mut param_names = Vec::with_capacity(pattern.matches('{').count());

        for segment in pattern.split('/') {
            if segment.is_empty() {
                continue;
            }
            if segment.starts_with('{') && segment.ends_with('}') {
                let inner = &segment[1..segment.len() - 1];
                let optional = inner.ends_with('?');
                let inner = inner.trim_end_matches('?');
                let name = match inner.split_once(':') {
                    Some((name, _constraint)) => name,
                    None => inner,
                };
                if optional {
                    regex_src.push_str("(?:/([^/]+))?");
                } else {
                    regex_src.push_str("/([^/]+)");
                }
                param_names.push(name.to_string());
            } else {
                regex_src.push('/');
                regex_src.push_str(&regex::escape(segment));
            }
        }

        regex_src.push('$');
        let regex = Regex::new(&regex_src).expect("failed to compile route pattern regex");
        (regex, param_names)
    }
}

impl RouteRegistrar for Router {
    fn register(&mut self, registration: RouteRegistration) {
        let (regex, param_names) = Self::path_to_regex(&registration.pattern);
        let priority = registration.priority.unwrap_or(0);
        info!(
            pattern = %registration.pattern,
            methods = %registration.methods,
            priority,
            handler = %registration.qualified_name,
            total_routes = self.routes.len() + 1,
            "route registered"
        );
        self.routes.push(CompiledRoute {
            pattern: registration.pattern,
            regex,
            param_names,
            methods: registration.methods,
            priority,
            handler: registration.handler,
            qualified_name: registration.qualified_name,
        });
        // Stable sort keeps registration sequence within one priority level.
        self.routes.sort_by_key(|route| route.priority);
    }
}
