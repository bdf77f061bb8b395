//! Network types shared by the HTTP responder and the realtime channel.
//!
//! These types are platform-neutral: the axum server on desktop and the
//! esp-idf-svc server on ESP32 both translate their native requests into
//! [`HttpRequest`] and their WebSocket callbacks into [`WsEvent`].
//!
//! # HTTP
//!
//! ```text
//! GET  /            - Greeting (greeter) or control page (control panel)
//! GET  /style.css   - Control page stylesheet
//! GET  /api/state   - Current drive state as JSON
//! *    anything     - 404 with method, URI and arguments echoed back
//! ```
//!
//! # WebSocket
//!
//! ```text
//! #F  forward     #B  backward
//! #L  pivot left  #R  pivot right
//! anything else   stop
//! ```

extern crate alloc;
use alloc::string::String;
use alloc::vec::Vec;

// ============================================================================
// HTTP
// ============================================================================

/// HTTP request methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET request.
    Get,
    /// HTTP POST request.
    Post,
    /// HTTP PUT request.
    Put,
    /// HTTP DELETE request.
    Delete,
    /// HTTP PATCH request.
    Patch,
    /// HTTP HEAD request.
    Head,
    /// HTTP OPTIONS request.
    Options,
}

impl HttpMethod {
    /// Upper-case method name as sent on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// Parse a method name (case-insensitive).
    ///
    /// ```
    /// use rs_wifibot::HttpMethod;
    ///
    /// assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::Get));
    /// assert_eq!(HttpMethod::parse("POST"), Some(HttpMethod::Post));
    /// assert_eq!(HttpMethod::parse("BREW"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        const ALL: [HttpMethod; 7] = [
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Delete,
            HttpMethod::Patch,
            HttpMethod::Head,
            HttpMethod::Options,
        ];
        ALL.into_iter().find(|m| m.as_str().eq_ignore_ascii_case(s))
    }
}

impl core::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request received by the server.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path without the query string (e.g. `/style.css`).
    pub path: String,
    /// Query arguments in the order they appeared.
    pub args: Vec<(String, String)>,
    /// Request body, if present.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Create a request with no arguments and no body.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            args: Vec::new(),
            body: None,
        }
    }

    /// Build a request from a raw URI, splitting off and parsing the query.
    ///
    /// ```
    /// use rs_wifibot::{HttpMethod, HttpRequest};
    ///
    /// let req = HttpRequest::from_uri(HttpMethod::Get, "/led?state=on&blink");
    /// assert_eq!(req.path, "/led");
    /// assert_eq!(req.arg("state"), Some("on"));
    /// assert_eq!(req.arg("blink"), Some(""));
    /// ```
    pub fn from_uri(method: HttpMethod, uri: &str) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (uri, None),
        };
        let path = if path.is_empty() { "/" } else { path };

        let mut req = Self::new(method, path);
        if let Some(query) = query {
            req.args = parse_query(query);
        }
        req
    }

    /// Attach a body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Look up the first query argument with the given name.
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the body as a UTF-8 string, if valid.
    pub fn body_str(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|b| core::str::from_utf8(b).ok())
    }
}

/// Split a query string into `(name, value)` pairs.
///
/// A bare name without `=` gets an empty value. `+` is decoded as a space and
/// percent escapes are decoded; invalid UTF-8 becomes U+FFFD.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Fill `buf` from a chunked body reader until EOF or the buffer is full.
///
/// Returns the bytes read. A read error ends the body early and is logged.
pub fn read_body<E, F>(buf: &mut [u8], mut read: F) -> usize
where
    E: core::fmt::Debug,
    F: FnMut(&mut [u8]) -> Result<usize, E>,
{
    let mut len = 0;
    while len < buf.len() {
        match read(&mut buf[len..]) {
            Ok(0) => break,
            Ok(n) => len += n,
            Err(e) => {
                tracing::warn!(error = ?e, read = len, "request body read failed");
                break;
            }
        }
    }
    len
}

/// An HTTP response to send to the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Content-Type header value.
    pub content_type: &'static str,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response with an explicit status and content type.
    pub fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    /// Creates a 200 OK `text/plain` response.
    pub fn ok_text(body: &str) -> Self {
        Self::new(200, "text/plain", body.as_bytes())
    }

    /// Creates a 200 OK `text/html` response.
    pub fn ok_html(body: &str) -> Self {
        Self::new(200, "text/html", body.as_bytes())
    }

    /// Creates a 200 OK `text/css` response.
    pub fn ok_css(body: &str) -> Self {
        Self::new(200, "text/css", body.as_bytes())
    }

    /// Creates a 200 OK `application/json` response.
    pub fn ok_json(body: &str) -> Self {
        Self::new(200, "application/json", body.as_bytes())
    }

    /// Returns the body as a UTF-8 string, if valid.
    pub fn body_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.body).ok()
    }
}

// ============================================================================
// WebSocket
// ============================================================================

/// Identifier handed out to each WebSocket client, used in log lines.
pub type ClientId = u32;

/// Event raised by a WebSocket transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WsEvent<'a> {
    /// A client finished the handshake.
    Connected {
        /// Client identifier.
        client: ClientId,
    },
    /// A text frame arrived.
    Text {
        /// Client identifier.
        client: ClientId,
        /// Frame payload, verbatim.
        payload: &'a [u8],
    },
    /// A binary frame arrived. Binary frames carry no commands.
    Binary {
        /// Client identifier.
        client: ClientId,
        /// Frame length in bytes.
        len: usize,
    },
    /// The client went away.
    Disconnected {
        /// Client identifier.
        client: ClientId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names_round_trip() {
        for m in [
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Delete,
            HttpMethod::Patch,
            HttpMethod::Head,
            HttpMethod::Options,
        ] {
            assert_eq!(HttpMethod::parse(m.as_str()), Some(m));
        }
    }

    #[test]
    fn from_uri_without_query() {
        let req = HttpRequest::from_uri(HttpMethod::Get, "/inline");
        assert_eq!(req.path, "/inline");
        assert!(req.args.is_empty());
    }

    #[test]
    fn from_uri_empty_path_is_root() {
        let req = HttpRequest::from_uri(HttpMethod::Get, "?a=1");
        assert_eq!(req.path, "/");
        assert_eq!(req.arg("a"), Some("1"));
    }

    #[test]
    fn query_decoding() {
        let args = parse_query("name=hello+world&x=%41%42&bad=%zz&&flag");
        assert_eq!(args.len(), 4);
        assert_eq!(args[0], ("name".into(), "hello world".into()));
        assert_eq!(args[1], ("x".into(), "AB".into()));
        assert_eq!(args[2], ("bad".into(), "%zz".into()));
        assert_eq!(args[3], ("flag".into(), String::new()));
    }

    #[test]
    fn query_trailing_percent() {
        let args = parse_query("p=50%");
        assert_eq!(args[0].1, "50%");
    }

    #[test]
    fn query_invalid_utf8_is_replaced() {
        let args = parse_query("n=%FF");
        assert_eq!(args[0].1, "\u{FFFD}");
    }

    /// Reader handing out `data` in `chunk`-sized pieces, then `tail`.
    fn chunked<'a>(
        data: &'a [u8],
        chunk: usize,
        tail: Result<usize, &'static str>,
    ) -> impl FnMut(&mut [u8]) -> Result<usize, &'static str> + 'a {
        let mut pos = 0;
        move |out: &mut [u8]| {
            if pos == data.len() {
                return tail;
            }
            let n = chunk.min(out.len()).min(data.len() - pos);
            out[..n].copy_from_slice(&data[pos..pos + n]);
            pos += n;
            Ok(n)
        }
    }

    #[test]
    fn body_read_joins_chunks() {
        let mut buf = [0u8; 16];
        let len = read_body(&mut buf, chunked(b"#F and more", 3, Ok(0)));
        assert_eq!(&buf[..len], b"#F and more");
    }

    #[test]
    fn body_read_stops_when_full() {
        let mut buf = [0u8; 4];
        let len = read_body(&mut buf, chunked(b"abcdefgh", 3, Ok(0)));
        assert_eq!(&buf[..len], b"abcd");
    }

    #[test]
    fn body_read_keeps_bytes_before_error() {
        let mut buf = [0u8; 16];
        let len = read_body(&mut buf, chunked(b"#L", 1, Err("socket reset")));
        assert_eq!(&buf[..len], b"#L");
    }

    #[test]
    fn response_helpers() {
        assert_eq!(HttpResponse::ok_text("hi").content_type, "text/plain");
        assert_eq!(HttpResponse::ok_css("a{}").content_type, "text/css");
        assert_eq!(HttpResponse::ok_html("<p>").status, 200);
        assert_eq!(HttpResponse::ok_json("{}").body_str(), Some("{}"));
    }
}
