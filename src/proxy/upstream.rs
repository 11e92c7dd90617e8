//! Upstream connection and request forwarding
//!
//! This module performs the actual downstream fetch: one TCP connection per
//! call, the request written exactly as received, one framed response read
//! back.

use async_trait::async_trait;
use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::http::parser::{ParseError, parse_http_response};
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::http::writer::serialize_request;
use crate::proxy::binding::Binding;
use crate::proxy::error::ForwardError;
use crate::proxy::forwarder::Downstream;

/// Default buffer size for reading responses
const BUFFER_SIZE: usize = 8192;

/// Plain HTTP/1.1 transport to a bound downstream.
#[derive(Debug, Clone)]
pub struct HttpDownstream {
    binding: Binding,
}

impl HttpDownstream {
    pub fn new(binding: Binding) -> Self {
        Self { binding }
    }
}

#[async_trait]
impl Downstream for HttpDownstream {
    async fn fetch(&self, request: Request) -> Result<Response, ForwardError> {
        let addr = self.binding.authority();
        let mut stream = TcpStream::connect(addr)
            .await
            .map_err(|source| ForwardError::Connect {
                addr: addr.to_string(),
                source,
            })?;

        tracing::trace!(downstream = self.binding.display_name(), "Connected to downstream");

        stream.write_all(&serialize_request(&request)).await?;
        stream.flush().await?;

        read_response(&mut stream, &request.method).await
    }

    fn name(&self) -> &str {
        self.binding.display_name()
    }
}

/// Reads one final response for a request made with `method`.
///
/// Interim 1xx responses (other than 101) are consumed and skipped.
pub async fn read_response<R>(stream: &mut R, method: &Method) -> Result<Response, ForwardError>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = BytesMut::with_capacity(BUFFER_SIZE);
    let mut eof = false;

    loop {
        match parse_http_response(&buffer, method, eof) {
            Ok((response, consumed)) => {
                if response.status.is_informational() && response.status.as_u16() != 101 {
                    buffer.advance(consumed);
                    continue;
                }
                return Ok(response);
            }
            Err(ParseError::Incomplete) if eof => return Err(ForwardError::Closed),
            Err(ParseError::Incomplete) => {}
            Err(e) => return Err(e.into()),
        }

        buffer.reserve(BUFFER_SIZE);
        if stream.read_buf(&mut buffer).await? == 0 {
            eof = true;
        }
    }
}
