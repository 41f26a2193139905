//! Tests for the handler catalog: registration, scan order, and the
//! duplicate-member configuration check.

use routemap::{HandlerCatalog, HandlerFactory, RequestContext, RouteMeta, RoutemapError};

#[derive(Default)]
struct Greeter;

impl HandlerFactory for Greeter {
    fn construct() -> anyhow::Result<Self> {
        Ok(Greeter::default())
    }
}

impl Greeter {
    fn hello(&self, cx: &mut RequestContext) {
        cx.response.set_text(200, "hello");
    }

    fn goodbye(&self, cx: &mut RequestContext) {
        cx.response.set_text(200, "goodbye");
    }
}

fn ping(cx: &mut RequestContext) {
    cx.response.set_text(200, "pong");
}

#[test]
fn test_scan_returns_members_in_registration_order() {
    let mut catalog = HandlerCatalog::new();
    catalog
        .handlers::<Greeter>()
        .route("hello", RouteMeta::new("/hello").unwrap(), Greeter::hello)
        .route(
            "goodbye",
            RouteMeta::new("/goodbye").unwrap(),
            Greeter::goodbye,
        );
    catalog.function("tests::ping", RouteMeta::new("/ping").unwrap(), ping);

    let descriptors = catalog.scan().unwrap();
    assert_eq!(descriptors.len(), 3);
    assert!(descriptors[0].qualified_name().ends_with("Greeter::hello"));
    assert!(descriptors[1].qualified_name().ends_with("Greeter::goodbye"));
    assert_eq!(descriptors[2].qualified_name(), "tests::ping");
    assert!(!descriptors[0].is_static());
    assert!(descriptors[2].is_static());
}

#[test]
fn test_member_may_carry_multiple_declarations() {
    let mut catalog = HandlerCatalog::new();
    catalog
        .handlers::<Greeter>()
        .route("hello", RouteMeta::new("/hello").unwrap(), Greeter::hello)
        .route(
            "hello",
            RouteMeta::new("/hello").unwrap().with_order(3),
            Greeter::hello,
        );

    let descriptors = catalog.scan().unwrap();
    assert_eq!(descriptors.len(), 1);
    assert_eq!(descriptors[0].routes().len(), 2);
    assert_eq!(descriptors[0].routes()[0].order(), 0);
    assert_eq!(descriptors[0].routes()[1].order(), 3);
}

#[test]
fn test_conflicting_member_registration_aborts_scan() {
    let mut catalog = HandlerCatalog::new();
    catalog
        .handlers::<Greeter>()
        .route("hello", RouteMeta::new("/hello").unwrap(), Greeter::hello)
        .route(
            "hello",
            RouteMeta::new("/other").unwrap(),
            Greeter::goodbye,
        );

    let err = catalog.scan().unwrap_err();
    match err {
        RoutemapError::Configuration { detail, .. } => {
            assert!(detail.contains("Greeter::hello"), "detail: {detail}");
        }
        other => panic!("expected configuration error, got {other}"),
    }
}

#[test]
fn test_static_function_repeat_appends_declaration() {
    let mut catalog = HandlerCatalog::new();
    catalog
        .function("tests::ping", RouteMeta::new("/ping").unwrap(), ping)
        .function(
            "tests::ping",
            RouteMeta::new("/ping").unwrap().with_order(1),
            ping,
        );

    let descriptors = catalog.scan().unwrap();
    assert_eq!(descriptors.len(), 1);
    assert_eq!(descriptors[0].routes().len(), 2);
}
