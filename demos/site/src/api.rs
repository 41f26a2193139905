//! JSON API handlers registered as static (instance-free) members.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use routemap::{report, DispatchTable, RequestContext};
use serde_json::json;

static API_INVOCATIONS: AtomicU64 = AtomicU64::new(0);

/// Double an integer route value, e.g. `/api/double/10`.
pub fn double_handler(cx: &mut RequestContext) {
    let invoked = API_INVOCATIONS.fetch_add(1, Ordering::Relaxed) + 1;

    let value = cx
        .get_path_param("val")
        .and_then(|raw| raw.parse::<i64>().ok());
    let Some(value) = value else {
        cx.response.set_json(
            400,
            json!({
                "error": "invalid route parameter, supply an integer value, e.g.: /api/double/10"
            }),
        );
        return;
    };

    cx.response.set_json(
        200,
        json!({
            "api_invoked_count": invoked,
            "input": value,
            "output": value * 2,
        }),
    );
}

/// The dispatch table listing as JSON.
pub fn routemaps_json(cx: &mut RequestContext) {
    let Some(table) = cx.service::<Arc<DispatchTable>>() else {
        cx.response
            .set_json(500, json!({ "error": "dispatch table service not available" }));
        return;
    };

    match serde_json::to_value(report::report_entries(table)) {
        Ok(entries) => {
            cx.response
                .set_json(200, json!({ "count": table.len(), "entries": entries }));
        }
        Err(err) => {
            cx.response
                .set_json(500, json!({ "error": err.to_string() }));
        }
    }
}
