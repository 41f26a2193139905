//! Tests for dispatch table construction: key uniqueness, instance sharing,
//! priority publication, and all-or-nothing visibility.

use std::sync::atomic::{AtomicU64, Ordering};

use http::Method;
use routemap::{
    publish_table, DispatchTable, HandlerCatalog, HandlerFactory, RequestContext,
    RouteMeta, RouteRegistrar, RouteRegistration, RoutemapError,
};
use serde_json::json;

/// Registrar that records what the publish step hands to the host.
#[derive(Default)]
struct RecordingRegistrar {
    registered: Vec<(String, Option<u32>, String)>,
}

impl RouteRegistrar for RecordingRegistrar {
    fn register(&mut self, registration: RouteRegistration) {
        self.registered.push((
            registration.pattern,
            registration.priority,
            registration.qualified_name,
        ));
    }
}

#[derive(Default)]
struct Foo;

impl HandlerFactory for Foo {
    fn construct() -> anyhow::Result<Self> {
        Ok(Foo::default())
    }
}

impl Foo {
    fn a(&self, cx: &mut RequestContext) {
        cx.response.set_text(200, "foo::a");
    }
}

#[derive(Default)]
struct Bar;

impl HandlerFactory for Bar {
    fn construct() -> anyhow::Result<Self> {
        Ok(Bar::default())
    }
}

impl Bar {
    fn b(&self, cx: &mut RequestContext) {
        cx.response.set_text(200, "bar::b");
    }
}

#[test]
fn test_duplicate_key_across_types_is_rejected() {
    let mut catalog = HandlerCatalog::new();
    catalog.handlers::<Foo>().route(
        "a",
        RouteMeta::new("/dup")
            .unwrap()
            .with_methods([Method::GET])
            .unwrap(),
        Foo::a,
    );
    catalog.handlers::<Bar>().route(
        "b",
        RouteMeta::new("/dup")
            .unwrap()
            .with_methods([Method::GET])
            .unwrap(),
        Bar::b,
    );

    let err = DispatchTable::build(&catalog).unwrap_err();
    match err {
        RoutemapError::DuplicateRoute {
            pattern,
            order,
            existing,
            incoming,
        } => {
            assert_eq!(pattern, "/dup");
            assert_eq!(order, 0);
            assert!(existing.qualified_name.ends_with("Foo::a"));
            assert!(incoming.qualified_name.ends_with("Bar::b"));
            assert!(existing.site.file().ends_with("table_tests.rs"));
            assert!(incoming.site.file().ends_with("table_tests.rs"));
        }
        other => panic!("expected duplicate route error, got {other}"),
    }
}

/// Two members of one type mutate shared state; visibility through both
/// bound targets proves a single shared instance backs them.
#[derive(Default)]
struct Tally {
    count: AtomicU64,
}

impl HandlerFactory for Tally {
    fn construct() -> anyhow::Result<Self> {
        Ok(Tally::default())
    }
}

impl Tally {
    fn bump_a(&self, cx: &mut RequestContext) {
        let count = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        cx.response.set_json(200, json!({ "count": count }));
    }

    fn bump_b(&self, cx: &mut RequestContext) {
        let count = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        cx.response.set_json(200, json!({ "count": count }));
    }
}

#[test]
fn test_instance_shared_across_bound_targets() {
    let mut catalog = HandlerCatalog::new();
    catalog
        .handlers::<Tally>()
        .route("bump_a", RouteMeta::new("/a").unwrap(), Tally::bump_a)
        .route("bump_b", RouteMeta::new("/b").unwrap(), Tally::bump_b);

    let table = DispatchTable::build(&catalog).unwrap();

    let mut cx = RequestContext::new(Method::GET, "/a");
    table.entry(0, "/a").unwrap().invoke(&mut cx);
    assert_eq!(cx.response.body["count"], 1);

    let mut cx = RequestContext::new(Method::GET, "/b");
    table.entry(0, "/b").unwrap().invoke(&mut cx);
    assert_eq!(
        cx.response.body["count"], 2,
        "state mutated through one bound target must be visible through another"
    );
}

fn static_p(cx: &mut RequestContext) {
    cx.response.set_text(200, "static p");
}

#[test]
fn test_same_pattern_under_distinct_orders_publishes_both() {
    let mut catalog = HandlerCatalog::new();
    catalog.function("tests::static_p", RouteMeta::new("/p").unwrap(), static_p);
    catalog.handlers::<Foo>().route(
        "a",
        RouteMeta::new("/p")
            .unwrap()
            .with_methods([Method::GET])
            .unwrap()
            .with_order(5),
        Foo::a,
    );

    let mut registrar = RecordingRegistrar::default();
    let table = publish_table(&catalog, &mut registrar).unwrap();
    assert_eq!(table.len(), 2);

    // Order 0 registers at the host's default priority, order 5 explicitly.
    assert!(registrar
        .registered
        .contains(&("/p".to_string(), None, "tests::static_p".to_string())));
    assert!(registrar
        .registered
        .iter()
        .any(|(pattern, priority, _)| pattern == "/p" && *priority == Some(5)));
}

#[test]
fn test_failed_build_publishes_nothing() {
    let mut catalog = HandlerCatalog::new();
    catalog.function("tests::static_p", RouteMeta::new("/ok").unwrap(), static_p);
    catalog.handlers::<Foo>().route(
        "a",
        RouteMeta::new("/dup").unwrap(),
        Foo::a,
    );
    catalog.handlers::<Bar>().route(
        "b",
        RouteMeta::new("/dup").unwrap(),
        Bar::b,
    );

    let mut registrar = RecordingRegistrar::default();
    let err = publish_table(&catalog, &mut registrar).unwrap_err();
    assert!(matches!(err, RoutemapError::DuplicateRoute { .. }));
    assert!(
        registrar.registered.is_empty(),
        "no entry may be visible to the host after a failed build"
    );
}

struct Unbuildable;

impl HandlerFactory for Unbuildable {
    fn construct() -> anyhow::Result<Self> {
        anyhow::bail!("constructor exploded")
    }
}

impl Unbuildable {
    fn handler(&self, cx: &mut RequestContext) {
        cx.response.set_text(200, "unreachable");
    }
}

#[test]
fn test_instantiation_failure_aborts_build() {
    let mut catalog = HandlerCatalog::new();
    catalog.handlers::<Unbuildable>().route(
        "handler",
        RouteMeta::new("/boom").unwrap(),
        Unbuildable::handler,
    );

    let err = DispatchTable::build(&catalog).unwrap_err();
    match err {
        RoutemapError::Instantiation { type_name, source } => {
            assert!(type_name.ends_with("Unbuildable"));
            assert!(source.to_string().contains("constructor exploded"));
        }
        other => panic!("expected instantiation error, got {other}"),
    }
}

#[test]
fn test_entries_iterate_in_ascending_key_order() {
    let mut catalog = HandlerCatalog::new();
    catalog
        .function(
            "tests::static_p",
            RouteMeta::new("/z").unwrap().with_order(2),
            static_p,
        )
        .function(
            "tests::static_p",
            RouteMeta::new("/a").unwrap(),
            static_p,
        )
        .function(
            "tests::static_p",
            RouteMeta::new("/m").unwrap().with_order(1),
            static_p,
        );

    let table = DispatchTable::build(&catalog).unwrap();
    let keys: Vec<(u32, String)> = table
        .entries()
        .map(|entry| (entry.order(), entry.pattern().to_string()))
        .collect();
    assert_eq!(
        keys,
        vec![
            (0, "/a".to_string()),
            (1, "/m".to_string()),
            (2, "/z".to_string()),
        ]
    );
}
