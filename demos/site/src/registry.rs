//! Registration table for every route-carrying member of the site.

use http::Method;
use routemap::{HandlerCatalog, RouteMeta, RoutemapError};

use crate::api;
use crate::pages::Pages;

pub fn build_catalog() -> Result<HandlerCatalog, RoutemapError> {
    let mut catalog = HandlerCatalog::new();

    catalog
        .handlers::<Pages>()
        .route("home_page", RouteMeta::new("/")?, Pages::home_page)
        .route(
            "product_page",
            RouteMeta::new("/product/{id:int}")?,
            Pages::product_page,
        )
        .route(
            "routemaps_page",
            RouteMeta::new("/routemaps")?,
            Pages::routemaps_page,
        )
        // The same pattern under two orders: the lower order matches first,
        // leaving the other declaration as an explicit fallback.
        .route(
            "promo_page",
            RouteMeta::new("/promo")?.with_order(1),
            Pages::promo_page,
        )
        .route(
            "promo_fallback_page",
            RouteMeta::new("/promo")?.with_order(2),
            Pages::promo_fallback_page,
        );

    catalog.function(
        "site::api::double_handler",
        RouteMeta::new("/api/double/{val:int?}")?,
        api::double_handler,
    );
    catalog.function(
        "site::api::routemaps_json",
        RouteMeta::new("/api/routemaps")?.with_methods([Method::GET])?,
        api::routemaps_json,
    );

    Ok(catalog)
}
