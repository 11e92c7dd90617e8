use crate::http::request::{connection_has, find_header};

/// HTTP status codes.
///
/// The codes the host produces itself have named variants; every code
/// received from the downstream is carried as `Other`.
/// - `BadRequest` (400): Malformed request
/// - `BadGateway` (502): The downstream failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 400 Bad Request
    BadRequest,
    /// 502 Bad Gateway
    BadGateway,
    /// Any other three-digit code
    Other(u16),
}

impl StatusCode {
    /// Maps a numeric code onto a variant. Returns `None` outside 100..=999.
    ///
    /// # Example
    ///
    /// ```
    /// # use relay::http::response::StatusCode;
    /// assert_eq!(StatusCode::from_u16(502), Some(StatusCode::BadGateway));
    /// assert_eq!(StatusCode::from_u16(200), Some(StatusCode::Other(200)));
    /// assert_eq!(StatusCode::from_u16(42), None);
    /// ```
    pub fn from_u16(code: u16) -> Option<Self> {
        let status = match code {
            400 => StatusCode::BadRequest,
            502 => StatusCode::BadGateway,
            100..=999 => StatusCode::Other(code),
            _ => return None,
        };
        Some(status)
    }

    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use relay::http::response::StatusCode;
    /// assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    /// assert_eq!(StatusCode::Other(204).as_u16(), 204);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::BadRequest => 400,
            StatusCode::BadGateway => 502,
            StatusCode::Other(code) => *code,
        }
    }

    /// Reason phrase used for locally produced responses.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::BadRequest => "Bad Request",
            StatusCode::BadGateway => "Bad Gateway",
            StatusCode::Other(_) => "",
        }
    }

    /// 1xx codes.
    pub fn is_informational(&self) -> bool {
        (100..200).contains(&self.as_u16())
    }

    /// Whether a response with this status never carries a body.
    pub fn forbids_body(&self) -> bool {
        self.is_informational() || matches!(self.as_u16(), 204 | 304)
    }
}

/// An HTTP response, either received from the downstream or produced locally.
///
/// Downstream responses keep their version, reason phrase, header order and
/// raw bytes so that they can be written back unchanged. The reason phrase
/// and header values may contain non-UTF-8 octets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP version from the status line
    pub version: String,
    /// The HTTP status code
    pub status: StatusCode,
    /// Reason phrase from the status line (may be empty)
    pub reason: Vec<u8>,
    /// HTTP headers as ordered name/value pairs
    pub headers: Vec<(String, Vec<u8>)>,
    /// Raw response body
    pub body: Vec<u8>,
    /// True when the body was delimited by the peer closing the connection
    pub close_delimited: bool,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::BadGateway)
///     .header("Content-Type", "text/plain")
///     .body(b"upstream down".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, Vec<u8>)>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header (names compare case-insensitively).
    ///
    /// # Example
    ///
    /// ```ignore
    /// builder.header("Content-Type", "text/plain")
    ///     .header("Cache-Control", "no-cache")
    /// ```
    pub fn header(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        let key = key.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&key));
        self.headers.push((key, value.into()));
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// Automatically adds the Content-Length header based on body size if not already present.
    pub fn build(mut self) -> Response {
        if find_header(&self.headers, "Content-Length").is_none() {
            self.headers
                .push(("Content-Length".to_string(), self.body.len().to_string().into_bytes()));
        }

        Response {
            version: "HTTP/1.1".to_string(),
            reason: self.status.reason_phrase().as_bytes().to_vec(),
            status: self.status,
            headers: self.headers,
            body: self.body,
            close_delimited: false,
        }
    }
}

impl Response {
    /// Creates a 400 Bad Request response.
    pub fn bad_request() -> Self {
        Self::plain(StatusCode::BadRequest, "400 Bad Request")
    }

    /// Creates a 502 Bad Gateway response.
    pub fn bad_gateway() -> Self {
        Self::plain(StatusCode::BadGateway, "502 Bad Gateway")
    }

    fn plain(status: StatusCode, body: &str) -> Self {
        ResponseBuilder::new(status)
            .header("Content-Type", "text/plain")
            .header("Connection", "close")
            .body(body.as_bytes().to_vec())
            .build()
    }

    /// Retrieves the first header value with the given name (case-insensitive).
    ///
    /// Returns `None` when the header is missing or its value is not UTF-8.
    pub fn header(&self, key: &str) -> Option<&str> {
        find_header(&self.headers, key).and_then(|v| std::str::from_utf8(v).ok())
    }

    /// Whether the client connection can be reused after writing this response.
    ///
    /// A 101 hands the connection to another protocol, which is not relayed.
    pub fn allows_keep_alive(&self) -> bool {
        self.status.as_u16() != 101
            && !self.close_delimited
            && !connection_has(&self.headers, "close")
    }
}
