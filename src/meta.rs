//! Route metadata: the immutable declaration attached to a handler member.
//!
//! A [`RouteMeta`] carries everything the dispatch table needs to know about
//! one route declaration: the host route-template pattern (opaque to this
//! crate beyond non-emptiness), the set of HTTP methods the route accepts,
//! a priority order, and the source location of the declaration for
//! diagnostics.
//!
//! The declaration site is captured automatically via `#[track_caller]`, so
//! a registration module reads like a literal table:
//!
//! ```rust
//! use routemap::RouteMeta;
//! # fn main() -> Result<(), routemap::RoutemapError> {
//! let primary = RouteMeta::new("/api/v1/test")?.with_order(1);
//! let fallback = RouteMeta::new("/api/v1/test")?.with_order(2);
//! assert_eq!(primary.pattern(), fallback.pattern());
//! assert!(primary.order() < fallback.order());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::panic::Location;

use http::Method;

use crate::error::RoutemapError;

/// The source location of a route declaration: file path and line number.
///
/// Captured with `#[track_caller]` at the `RouteMeta` constructor call site.
/// Diagnostic only; never used for table correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    file: &'static str,
    line: u32,
}

impl CallSite {
    /// Capture the caller's source location.
    #[track_caller]
    #[must_use]
    pub fn here() -> Self {
        let location = Location::caller();
        CallSite {
            file: location.file(),
            line: location.line(),
        }
    }

    #[must_use]
    pub fn file(&self) -> &'static str {
        self.file
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, line {}", self.file, self.line)
    }
}

/// A non-empty set of HTTP methods a route accepts.
///
/// Stored sorted and de-duplicated so two sets declaring the same methods in
/// a different order compare and render identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSet(Vec<Method>);

impl MethodSet {
    /// Build a set from any iterator of methods. Returns `None` when the
    /// iterator yields nothing: an empty method set is never valid.
    #[must_use]
    pub fn of(methods: impl IntoIterator<Item = Method>) -> Option<Self> {
        let mut methods: Vec<Method> = methods.into_iter().collect();
        if methods.is_empty() {
            return None;
        }
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods.dedup();
        Some(MethodSet(methods))
    }

    #[must_use]
    pub fn contains(&self, method: &Method) -> bool {
        self.0.contains(method)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Method> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        // Guaranteed non-empty by construction; kept for API completeness.
        self.0.is_empty()
    }
}

impl Default for MethodSet {
    /// The default method set for an unspecified declaration: GET and POST.
    fn default() -> Self {
        MethodSet(vec![Method::GET, Method::POST])
    }
}

impl fmt::Display for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, method) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{method}")?;
        }
        Ok(())
    }
}

/// One immutable route declaration.
///
/// Produced once at startup and never mutated afterward. Validation happens
/// at construction: the pattern must be non-empty and the method set, when
/// overridden, must name at least one method.
#[derive(Debug, Clone)]
pub struct RouteMeta {
    pattern: String,
    methods: MethodSet,
    order: u32,
    site: CallSite,
}

impl RouteMeta {
    /// Declare a route for `pattern` accepting GET and POST at default order.
    ///
    /// The declaration site is captured from the caller. Fails with a
    /// configuration error when the pattern is empty or whitespace.
    #[track_caller]
    pub fn new(pattern: impl Into<String>) -> Result<Self, RoutemapError> {
        let site = CallSite::here();
        let pattern = pattern.into();
        if pattern.trim().is_empty() {
            return Err(RoutemapError::configuration(
                "route pattern must not be empty",
                Some(site),
            ));
        }
        Ok(RouteMeta {
            pattern,
            methods: MethodSet::default(),
            order: 0,
            site,
        })
    }

    /// Replace the allowed method set. Fails with a configuration error when
    /// the iterator yields no methods.
    pub fn with_methods(
        mut self,
        methods: impl IntoIterator<Item = Method>,
    ) -> Result<Self, RoutemapError> {
        match MethodSet::of(methods) {
            Some(set) => {
                self.methods = set;
                Ok(self)
            }
            None => Err(RoutemapError::configuration(
                format!(
                    "route pattern \"{}\" declares an empty method set",
                    self.pattern
                ),
                Some(self.site),
            )),
        }
    }

    /// Set the route order. Lower values match first; negative input is
    /// normalized to 0, the default "no explicit preference" order.
    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order.max(0) as u32;
        self
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn methods(&self) -> &MethodSet {
        &self.methods
    }

    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }

    #[must_use]
    pub fn site(&self) -> CallSite {
        self.site
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_set_sorted_and_deduped() {
        let set = MethodSet::of([Method::POST, Method::GET, Method::POST]).unwrap();
        let names: Vec<&str> = set.iter().map(Method::as_str).collect();
        assert_eq!(names, vec!["GET", "POST"]);
    }

    #[test]
    fn test_whitespace_pattern_rejected() {
        let err = RouteMeta::new("   ").unwrap_err();
        assert!(matches!(err, RoutemapError::Configuration { .. }));
    }

    #[test]
    fn test_negative_order_normalized() {
        let meta = RouteMeta::new("/x").unwrap().with_order(-7);
        assert_eq!(meta.order(), 0);
    }

    #[test]
    fn test_site_points_at_declaration() {
        let meta = RouteMeta::new("/here").unwrap();
        assert!(meta.site().file().ends_with("meta.rs"));
        assert!(meta.site().line() > 0);
    }
}
