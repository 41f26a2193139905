//! Website pages, each member declared in the site's registration table.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use routemap::{DispatchTable, HandlerFactory, RequestContext};

/// Page handlers with per-page render counters.
///
/// One `Pages` instance is shared by every bound page route. The counters
/// are atomics because the hosting runtime may invoke the same instance
/// concurrently from several workers once serving begins.
#[derive(Default)]
pub struct Pages {
    home_renders: AtomicU64,
    product_renders: AtomicU64,
}

impl HandlerFactory for Pages {
    fn construct() -> anyhow::Result<Self> {
        Ok(Pages::default())
    }
}

impl Pages {
    /// Render the home page.
    pub fn home_page(&self, cx: &mut RequestContext) {
        let renders = self.home_renders.fetch_add(1, Ordering::Relaxed) + 1;
        cx.response.set_html(format!(
            "<b>Home</b> (render count: {renders})\n\
             <ul>\n\
             <li><a href=\"/product/22\">/product/22</a></li>\n\
             <li><a href=\"/routemaps\">/routemaps</a></li>\n\
             </ul>"
        ));
    }

    /// Render a product page for a given product ID.
    pub fn product_page(&self, cx: &mut RequestContext) {
        let renders = self.product_renders.fetch_add(1, Ordering::Relaxed) + 1;
        match cx.get_path_param("id") {
            Some(id) => {
                cx.response.set_html(format!(
                    "<b>Product Page</b> (render count: {renders})\n\
                     <ul><li>Product ID: {id}</li></ul>"
                ));
            }
            None => {
                cx.response
                    .set_text(400, "missing product ID, e.g.: /product/22");
            }
        }
    }

    /// Render a page listing every published dispatch entry.
    ///
    /// The table arrives as a host-provided service on the request context.
    pub fn routemaps_page(&self, cx: &mut RequestContext) {
        let Some(table) = cx.service::<Arc<DispatchTable>>() else {
            cx.response
                .set_text(500, "dispatch table service not available");
            return;
        };

        let mut html = String::new();
        html.push_str(&format!(
            "<b>Number of dispatch entries defined: {}</b><ol>\n",
            table.len()
        ));
        for entry in table.entries() {
            html.push_str(&format!(
                "<li>Route pattern: {}\n\
                 <ul>\n\
                 <li>Allowed HTTP methods: {}</li>\n\
                 <li>Order: {}</li>\n\
                 <li>Mapped to handler: {}</li>\n\
                 <li>Source file: {}, line: {}</li>\n\
                 </ul></li>\n",
                entry.pattern(),
                entry.methods(),
                entry.order(),
                entry.qualified_name(),
                entry.site().file(),
                entry.site().line(),
            ));
        }
        html.push_str("</ol>");
        cx.response.set_html(html);
    }

    /// Primary handler for `/promo` (order 1, matches first).
    pub fn promo_page(&self, cx: &mut RequestContext) {
        cx.response.set_html("<b>Promo</b> (primary handler)");
    }

    /// Fallback handler for `/promo` (order 2, shadowed by the primary).
    pub fn promo_fallback_page(&self, cx: &mut RequestContext) {
        cx.response.set_html("<b>Promo</b> (fallback handler)");
    }
}
