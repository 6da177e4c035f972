use chrono::{DateTime, Utc};
use std::fmt;
use std::time::SystemTime;
use tokio::fs::File;

/// Value of the `Server` header.
pub const SERVER_NAME: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP status codes produced by the server.
///
/// - `Ok` (200): File served
/// - `BadRequest` (400): Malformed request line, traversal attempt or oversized path
/// - `Forbidden` (403): File exists but cannot be opened
/// - `NotFound` (404): Missing or not a regular file
/// - `MethodNotAllowed` (405): Anything but GET and HEAD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use docserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

/// RFC 1123 formatted date, second resolution.
pub struct HttpDate(pub SystemTime);

impl fmt::Display for HttpDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let datetime = DateTime::<Utc>::from(self.0);
        write!(f, "{}", datetime.format("%a, %d %b %Y %H:%M:%S GMT"))
    }
}

/// Response headers in the order they are written.
///
/// Setting a name that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&key)) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What follows the header block.
#[derive(Debug)]
pub enum Body {
    /// Nothing, e.g. the answer to HEAD
    Empty,
    /// A generated body held in memory
    Bytes(Vec<u8>),
    /// An open file streamed in chunks; the length is its stat'd size
    File { file: File, len: u64 },
}

impl Body {
    /// Number of bytes that will be written after the headers.
    pub fn len(&self) -> u64 {
        match self {
            Body::Empty => 0,
            Body::Bytes(bytes) => bytes.len() as u64,
            Body::File { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Headers in wire order
    pub headers: Headers,
    pub body: Body,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// `build` completes the fixed header set in wire order:
/// `Date`, `Server`, `Content-Type` (when given), `Content-Length`,
/// `Connection: close`.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .content_type("text/plain; charset=utf-8")
///     .body(Body::Bytes(b"hi".to_vec()))
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    date: SystemTime,
    content_type: Option<String>,
    content_length: Option<u64>,
    body: Body,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            date: SystemTime::now(),
            content_type: None,
            content_length: None,
            body: Body::Empty,
        }
    }

    /// Overrides the `Date` header timestamp.
    pub fn date(mut self, date: SystemTime) -> Self {
        self.date = date;
        self
    }

    pub fn content_type(mut self, mime: impl Into<String>) -> Self {
        self.content_type = Some(mime.into());
        self
    }

    /// Declares a `Content-Length` independent of the body, as HEAD needs.
    pub fn content_length(mut self, len: u64) -> Self {
        self.content_length = Some(len);
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// `Content-Length` defaults to the body length unless declared.
    pub fn build(self) -> Response {
        let mut headers = Headers::new();
        headers.set("Date", HttpDate(self.date).to_string());
        headers.set("Server", SERVER_NAME);
        if let Some(mime) = self.content_type {
            headers.set("Content-Type", mime);
        }
        let length = self.content_length.unwrap_or_else(|| self.body.len());
        headers.set("Content-Length", length.to_string());
        headers.set("Connection", "close");

        Response {
            status: self.status,
            headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Creates an error response carrying a minimal HTML page.
    pub fn error(status: StatusCode) -> Self {
        ResponseBuilder::new(status)
            .content_type("text/html; charset=utf-8")
            .body(Body::Bytes(error_page(status)))
            .build()
    }

    /// Creates a 200 response for an opened file of `len` bytes.
    ///
    /// With `head_only` the file is dropped and no body follows, but
    /// `Content-Length` still reports the file size.
    pub fn file(file: File, len: u64, mime: &str, head_only: bool) -> Self {
        let body = if head_only {
            Body::Empty
        } else {
            Body::File { file, len }
        };

        ResponseBuilder::new(StatusCode::Ok)
            .content_type(mime)
            .content_length(len)
            .body(body)
            .build()
    }

    pub fn bad_request() -> Self {
        Self::error(StatusCode::BadRequest)
    }

    pub fn forbidden() -> Self {
        Self::error(StatusCode::Forbidden)
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        Self::error(StatusCode::NotFound)
    }

    pub fn method_not_allowed() -> Self {
        Self::error(StatusCode::MethodNotAllowed)
    }
}

/// Minimal HTML document naming the status.
pub fn error_page(status: StatusCode) -> Vec<u8> {
    format!(
        "<!DOCTYPE html>\n<html><head><title>{status}</title></head>\
         <body><h1>{status}</h1></body></html>\n"
    )
    .into_bytes()
}
