use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::meta::CallSite;

/// Identifies one route declaration for diagnostics: the qualified name of
/// the handler member that carries it and the site of the declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationRef {
    pub qualified_name: String,
    pub site: CallSite,
}

impl fmt::Display for DeclarationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.qualified_name, self.site)
    }
}

/// Errors raised while declaring routes, building the dispatch table, or
/// exporting the route report.
///
/// `Configuration`, `Instantiation`, and `DuplicateRoute` are startup-fatal:
/// they propagate out of table construction and no entry is published to the
/// host. `DiagnosticIo` is local to the report export and never invalidates
/// an already-published table.
#[derive(Debug)]
pub enum RoutemapError {
    /// A route declaration or handler registration violates the declaration
    /// contract (empty pattern, empty method set, conflicting member
    /// registration).
    Configuration {
        detail: String,
        site: Option<CallSite>,
    },
    /// A handler-owning type could not be constructed by its
    /// [`HandlerFactory`](crate::registry::HandlerFactory) path.
    Instantiation {
        type_name: &'static str,
        source: anyhow::Error,
    },
    /// Two declarations collide on the `(order, pattern)` table key.
    DuplicateRoute {
        pattern: String,
        order: u32,
        existing: DeclarationRef,
        incoming: DeclarationRef,
    },
    /// The route report could not be written to its destination.
    DiagnosticIo { path: PathBuf, source: io::Error },
}

impl RoutemapError {
    pub(crate) fn configuration(detail: impl Into<String>, site: Option<CallSite>) -> Self {
        RoutemapError::Configuration {
            detail: detail.into(),
            site,
        }
    }

    /// Whether the error aborts table construction.
    ///
    /// Everything except `DiagnosticIo` is fatal to startup.
    #[must_use]
    pub fn is_startup_fatal(&self) -> bool {
        !matches!(self, RoutemapError::DiagnosticIo { .. })
    }
}

impl fmt::Display for RoutemapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutemapError::Configuration { detail, site } => {
                write!(f, "configuration error: {detail}")?;
                if let Some(site) = site {
                    write!(f, " ({site})")?;
                }
                Ok(())
            }
            RoutemapError::Instantiation { type_name, source } => {
                write!(
                    f,
                    "unable to construct handler instance for type {type_name}: {source}"
                )
            }
            RoutemapError::DuplicateRoute {
                pattern,
                order,
                existing,
                incoming,
            } => {
                write!(
                    f,
                    "duplicate route pattern \"{pattern}\" at order {order}: \
                     {incoming} collides with previously registered {existing}"
                )
            }
            RoutemapError::DiagnosticIo { path, source } => {
                write!(
                    f,
                    "unable to write route report to {}: {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for RoutemapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RoutemapError::Instantiation { source, .. } => {
                Some(AsRef::<dyn std::error::Error>::as_ref(source))
            }
            RoutemapError::DiagnosticIo { source, .. } => Some(source),
            _ => None,
        }
    }
}
