use crate::http::request::{Method, Request, find_header, header_list, is_token};
use crate::http::response::{Response, StatusCode};

/// Upper bound on a message head (start line plus headers).
pub const MAX_HEAD_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("malformed start line")]
    InvalidRequest,
    #[error("invalid method token")]
    InvalidMethod,
    #[error("malformed header line")]
    InvalidHeader,
    #[error("invalid Content-Length")]
    InvalidContentLength,
    #[error("both Transfer-Encoding and Content-Length present")]
    AmbiguousFraming,
    #[error("invalid status line")]
    InvalidStatus,
    #[error("malformed chunked body")]
    InvalidChunk,
    #[error("unsupported Transfer-Encoding")]
    UnsupportedTransferEncoding,
    #[error("message head exceeds 64 KiB")]
    HeadTooLarge,
    #[error("incomplete message")]
    Incomplete,
}

/// How the end of a message body is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFraming {
    /// Exactly this many bytes follow the head
    Length(usize),
    /// Chunked transfer coding, terminated by a zero-size chunk and trailers
    Chunked,
    /// Everything until the peer closes the connection (responses only)
    UntilClose,
}

/// Parses one request from the front of `buf`.
///
/// Returns the request and the number of bytes it occupied. The body is kept
/// in its wire form, so a chunked request keeps its chunk framing.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let headers_end = find_head_end(buf)?;
    let mut lines = head_lines(&buf[..headers_end]);

    // Request line
    let request_line = lines.next().ok_or(ParseError::InvalidRequest)?;
    let request_line =
        std::str::from_utf8(request_line).map_err(|_| ParseError::InvalidRequest)?;
    let mut parts = request_line.split(' ');

    let method_str = parts.next().ok_or(ParseError::InvalidRequest)?;
    let path = parts.next().ok_or(ParseError::InvalidRequest)?;
    let version = parts.next().ok_or(ParseError::InvalidRequest)?;

    if parts.next().is_some() || path.is_empty() || !version.starts_with("HTTP/") {
        return Err(ParseError::InvalidRequest);
    }

    let method = Method::from_str(method_str).ok_or(ParseError::InvalidMethod)?;
    let headers = parse_headers(lines)?;

    let framing = request_framing(&headers)?;
    let body_start = headers_end + 4;
    let body_len = body_length(framing, &buf[body_start..], false)?;

    let request = Request {
        method,
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body: buf[body_start..body_start + body_len].to_vec(),
    };

    Ok((request, body_start + body_len))
}

/// Parses one response from the front of `buf`.
///
/// `method` is the method of the request this answers (a HEAD response has
/// no body). `eof` says whether the peer has closed its side, which is the
/// only way a close-delimited body can be complete.
pub fn parse_http_response(
    buf: &[u8],
    method: &Method,
    eof: bool,
) -> Result<(Response, usize), ParseError> {
    let headers_end = find_head_end(buf)?;
    let mut lines = head_lines(&buf[..headers_end]);

    let status_line = lines.next().ok_or(ParseError::InvalidStatus)?;
    let mut parts = status_line.splitn(3, |b| *b == b' ');

    let version = parts
        .next()
        .and_then(|v| std::str::from_utf8(v).ok())
        .ok_or(ParseError::InvalidStatus)?;
    let code = parts
        .next()
        .and_then(|c| std::str::from_utf8(c).ok())
        .ok_or(ParseError::InvalidStatus)?;
    // Reason phrase may carry obs-text; kept as bytes
    let reason = parts.next().unwrap_or_default();

    if !version.starts_with("HTTP/") || code.len() != 3 {
        return Err(ParseError::InvalidStatus);
    }

    let status = code
        .parse::<u16>()
        .ok()
        .and_then(StatusCode::from_u16)
        .ok_or(ParseError::InvalidStatus)?;

    let headers = parse_headers(lines)?;

    let framing = response_framing(&headers, status, method)?;
    let body_start = headers_end + 4;
    let body_len = body_length(framing, &buf[body_start..], eof)?;

    let response = Response {
        version: version.to_string(),
        status,
        reason: reason.to_vec(),
        headers,
        body: buf[body_start..body_start + body_len].to_vec(),
        close_delimited: framing == BodyFraming::UntilClose,
    };

    Ok((response, body_start + body_len))
}

/// Framing of a request body per RFC 9112 section 6.3.
///
/// A request carrying both Transfer-Encoding and Content-Length is rejected
/// rather than forwarded with conflicting framing.
pub fn request_framing(headers: &[(String, Vec<u8>)]) -> Result<BodyFraming, ParseError> {
    if let Some(chunked) = transfer_encoding_is_chunked(headers) {
        if find_header(headers, "Content-Length").is_some() {
            return Err(ParseError::AmbiguousFraming);
        }
        return if chunked {
            Ok(BodyFraming::Chunked)
        } else {
            Err(ParseError::UnsupportedTransferEncoding)
        };
    }

    Ok(BodyFraming::Length(content_length(headers)?.unwrap_or(0)))
}

/// Framing of a response body per RFC 9112 section 6.3.
pub fn response_framing(
    headers: &[(String, Vec<u8>)],
    status: StatusCode,
    method: &Method,
) -> Result<BodyFraming, ParseError> {
    if *method == Method::HEAD || status.forbids_body() {
        return Ok(BodyFraming::Length(0));
    }

    match transfer_encoding_is_chunked(headers) {
        Some(true) => return Ok(BodyFraming::Chunked),
        Some(false) => return Ok(BodyFraming::UntilClose),
        None => {}
    }

    Ok(content_length(headers)?
        .map(BodyFraming::Length)
        .unwrap_or(BodyFraming::UntilClose))
}

/// Length in bytes of the complete chunked body at the front of `buf`,
/// including the terminating chunk and trailer section.
///
/// Returns `Ok(None)` while more bytes are needed.
pub fn chunked_body_len(buf: &[u8]) -> Result<Option<usize>, ParseError> {
    let mut pos = 0;

    loop {
        let Some(line_len) = find_crlf(&buf[pos..]) else {
            return Ok(None);
        };

        let line = std::str::from_utf8(&buf[pos..pos + line_len])
            .map_err(|_| ParseError::InvalidChunk)?;
        let size_str = line.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_str, 16).map_err(|_| ParseError::InvalidChunk)?;
        pos += line_len + 2;

        if size == 0 {
            // Trailer section ends with an empty line
            let rest = &buf[pos..];
            if rest.starts_with(b"\r\n") {
                return Ok(Some(pos + 2));
            }
            if rest.len() < 2 {
                return Ok(None);
            }
            return Ok(find_headers_end(rest).map(|end| pos + end + 4));
        }

        let chunk_end = pos
            .checked_add(size)
            .and_then(|data_end| data_end.checked_add(2))
            .ok_or(ParseError::InvalidChunk)?;
        if buf.len() < chunk_end {
            return Ok(None);
        }
        if &buf[chunk_end - 2..chunk_end] != b"\r\n" {
            return Err(ParseError::InvalidChunk);
        }
        pos = chunk_end;
    }
}

fn body_length(framing: BodyFraming, body: &[u8], eof: bool) -> Result<usize, ParseError> {
    match framing {
        BodyFraming::Length(n) if body.len() >= n => Ok(n),
        BodyFraming::Length(_) => Err(ParseError::Incomplete),
        BodyFraming::Chunked => chunked_body_len(body)?.ok_or(ParseError::Incomplete),
        BodyFraming::UntilClose if eof => Ok(body.len()),
        BodyFraming::UntilClose => Err(ParseError::Incomplete),
    }
}

/// Offset of the blank line ending the head, bounded by `MAX_HEAD_SIZE`.
fn find_head_end(buf: &[u8]) -> Result<usize, ParseError> {
    let Some(headers_end) = find_headers_end(buf) else {
        if buf.len() > MAX_HEAD_SIZE {
            return Err(ParseError::HeadTooLarge);
        }
        return Err(ParseError::Incomplete);
    };

    if headers_end > MAX_HEAD_SIZE {
        return Err(ParseError::HeadTooLarge);
    }

    Ok(headers_end)
}

fn head_lines(head: &[u8]) -> impl Iterator<Item = &[u8]> {
    head.split(|b| *b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

/// Header names must be ASCII tokens; values are kept as raw bytes.
fn parse_headers<'a>(
    lines: impl Iterator<Item = &'a [u8]>,
) -> Result<Vec<(String, Vec<u8>)>, ParseError> {
    let mut headers = Vec::new();

    for line in lines {
        if line.is_empty() {
            continue;
        }

        let colon = line
            .iter()
            .position(|b| *b == b':')
            .ok_or(ParseError::InvalidHeader)?;

        // No whitespace allowed between field name and colon
        let name = std::str::from_utf8(&line[..colon])
            .ok()
            .filter(|name| is_token(name))
            .ok_or(ParseError::InvalidHeader)?;

        headers.push((name.to_string(), line[colon + 1..].trim_ascii().to_vec()));
    }

    Ok(headers)
}

/// `Some(true)` if the final transfer coding is chunked, `Some(false)` if a
/// Transfer-Encoding header exists but does not end in chunked.
fn transfer_encoding_is_chunked(headers: &[(String, Vec<u8>)]) -> Option<bool> {
    find_header(headers, "Transfer-Encoding")?;

    let last = header_list(headers, "Transfer-Encoding")
        .filter(|c| !c.is_empty())
        .last();

    Some(last.is_some_and(|c| c.eq_ignore_ascii_case(b"chunked")))
}

/// All Content-Length values must parse and agree.
fn content_length(headers: &[(String, Vec<u8>)]) -> Result<Option<usize>, ParseError> {
    let mut length = None;

    for part in header_list(headers, "Content-Length") {
        if part.is_empty() || !part.iter().all(u8::is_ascii_digit) {
            return Err(ParseError::InvalidContentLength);
        }
        let n = std::str::from_utf8(part)
            .ok()
            .and_then(|digits| digits.parse::<usize>().ok())
            .ok_or(ParseError::InvalidContentLength)?;
        match length {
            Some(prev) if prev != n => return Err(ParseError::InvalidContentLength),
            _ => length = Some(n),
        }
    }

    Ok(length)
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}
