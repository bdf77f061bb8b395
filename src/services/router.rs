//! HTTP responder shared by the desktop and ESP32 servers.
//!
//! Both servers translate their native request into an [`HttpRequest`], hand
//! it to an [`HttpResponder`], and write the returned [`HttpResponse`] back.
//! Routing, the not-found page and the status LED pulse therefore behave the
//! same on both platforms.
//!
//! # Example
//!
//! ```rust
//! use rs_wifibot::hal::MockStatusLed;
//! use rs_wifibot::services::{greeter_routes, HttpResponder};
//! use rs_wifibot::traits::{HttpMethod, HttpRequest};
//!
//! let mut responder = HttpResponder::new(greeter_routes("wifibot"), MockStatusLed::new());
//!
//! let resp = responder.handle(&HttpRequest::new(HttpMethod::Get, "/"));
//! assert_eq!(resp.body_str(), Some("hello from wifibot!"));
//!
//! let resp = responder.handle(&HttpRequest::new(HttpMethod::Get, "/missing"));
//! assert_eq!(resp.status, 404);
//! assert_eq!(responder.indicator().pulses, 2);
//! ```

use std::fmt::Write as _;

use crate::config::{Config, SiteProfile};
use crate::traits::{HttpMethod, HttpRequest, HttpResponse, StatusIndicator};

use super::assets::StaticAssets;
use super::shared::DriveLink;

/// Route handler.
pub type Handler = Box<dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync>;

struct Route {
    method: HttpMethod,
    path: String,
    handler: Handler,
}

// ============================================================================
// Router
// ============================================================================

/// Ordered table of (method, path) → handler.
///
/// Paths match exactly. The first registered match wins; anything unmatched
/// gets [`not_found`].
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Empty router; every request is answered by [`not_found`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler.
    pub fn route<F>(mut self, method: HttpMethod, path: &str, handler: F) -> Self
    where
        F: Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
    {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            handler: Box::new(handler),
        });
        self
    }

    /// Register a GET handler.
    pub fn get<F>(self, path: &str, handler: F) -> Self
    where
        F: Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
    {
        self.route(HttpMethod::Get, path, handler)
    }

    /// Answer `req` with the first matching handler, else [`not_found`].
    pub fn dispatch(&self, req: &HttpRequest) -> HttpResponse {
        match self
            .routes
            .iter()
            .find(|r| r.method == req.method && r.path == req.path)
        {
            Some(route) => (route.handler)(req),
            None => not_found(req),
        }
    }

    /// Whether a handler is registered for `method` and `path`.
    pub fn contains(&self, method: HttpMethod, path: &str) -> bool {
        self.routes
            .iter()
            .any(|r| r.method == method && r.path == path)
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true when no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl core::fmt::Debug for Router {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.routes.iter().map(|r| (r.method, r.path.as_str())))
            .finish()
    }
}

/// Diagnostic 404 page echoing the request back.
///
/// ```text
/// File Not Found
///
/// URI: /nope
/// Method: GET
/// Arguments: 1
///  x: 1
/// ```
pub fn not_found(req: &HttpRequest) -> HttpResponse {
    let mut body = String::from("File Not Found\n\n");
    let _ = writeln!(body, "URI: {}", req.path);
    let _ = writeln!(body, "Method: {}", req.method);
    let _ = writeln!(body, "Arguments: {}", req.args.len());
    for (name, value) in &req.args {
        let _ = writeln!(body, " {}: {}", name, value);
    }
    HttpResponse::new(404, "text/plain", body)
}

// ============================================================================
// Site profiles
// ============================================================================

/// Greeter routes: `/` and `/inline`.
pub fn greeter_routes(device_name: &str) -> Router {
    let greeting = format!("hello from {}!", device_name);
    Router::new()
        .get("/", move |_| HttpResponse::ok_text(&greeting))
        .get("/inline", |_| HttpResponse::ok_text("this works as well"))
}

/// Control panel routes: page, stylesheet and the state endpoint.
///
/// The page opens its WebSocket on `ws_path`.
pub fn control_panel_routes<L>(assets: StaticAssets, ws_path: &str, link: L) -> Router
where
    L: DriveLink + 'static,
{
    let StaticAssets { html, css } = assets.with_ws_path(ws_path);
    let router = Router::new()
        .get("/", move |_| HttpResponse::ok_html(&html))
        .get("/style.css", move |_| HttpResponse::ok_css(&css));

    #[cfg(feature = "serde")]
    let router = router.get("/api/state", move |_| {
        match serde_json::to_string(&link.snapshot()) {
            Ok(json) => HttpResponse::ok_json(&json),
            Err(e) => HttpResponse::new(500, "text/plain", e.to_string()),
        }
    });
    #[cfg(not(feature = "serde"))]
    let _ = link;

    router
}

/// Routes for the configured site profile.
pub fn site_routes<L>(config: &Config, assets: StaticAssets, link: L) -> Router
where
    L: DriveLink + 'static,
{
    match config.web.site {
        SiteProfile::Greeter => greeter_routes(config.device.name.as_str()),
        SiteProfile::ControlPanel => {
            control_panel_routes(assets, config.web.ws_path.as_str(), link)
        }
    }
}

// ============================================================================
// Responder
// ============================================================================

/// Router plus the status indicator pulsed around every request.
pub struct HttpResponder<S: StatusIndicator> {
    router: Router,
    indicator: S,
}

impl<S: StatusIndicator> HttpResponder<S> {
    /// Create a responder.
    pub fn new(router: Router, indicator: S) -> Self {
        Self { router, indicator }
    }

    /// Handle one request: indicator on, dispatch, indicator off.
    pub fn handle(&mut self, req: &HttpRequest) -> HttpResponse {
        self.indicator.on();
        let resp = self.router.dispatch(req);
        self.indicator.off();

        tracing::debug!(
            method = req.method.as_str(),
            path = %req.path,
            status = resp.status,
            "http request"
        );
        resp
    }

    /// The route table.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// The status indicator.
    pub fn indicator(&self) -> &S {
        &self.indicator
    }
}
