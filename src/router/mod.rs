//! # Router Module
//!
//! The host-facing side of the crate: the route-registration capability the
//! dispatch table publishes into, and a reference router implementation that
//! matches simulated requests against published routes.
//!
//! ## Overview
//!
//! The module provides:
//! - [`RouteRegistrar`] - the capability a host router exposes; the dispatch
//!   table performs one [`RouteRegistrar::register`] call per entry during
//!   its atomic publish
//! - [`Router`] - a reference host implementation used by the demo site and
//!   the test suite, with order-aware matching (lower order matches first)
//! - [`RouteMatch`] - the result of matching one request, with extracted
//!   path parameters
//!
//! ## Architecture
//!
//! The reference router uses a two-phase approach:
//!
//! 1. **Compilation**: At registration, route patterns (e.g. `/pets/{id}`)
//!    are converted into anchored regex patterns that match and extract path
//!    parameters.
//!
//! 2. **Matching**: For each request, compiled patterns are tested in
//!    ascending priority order; the first pattern whose method set and regex
//!    both match wins.

mod core;

pub use self::core::{RouteMatch, RouteRegistrar, RouteRegistration, Router};
