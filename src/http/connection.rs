use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

use crate::http::parser::{ParseError, parse_http_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::proxy::Forwarder;

pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    forwarder: Forwarder,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, forwarder: Forwarder) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            forwarder,
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Ok(Some(req)) => ConnectionState::Processing(req),
                        Ok(None) => ConnectionState::Closed,
                        Err(e) => {
                            tracing::warn!(error = %e, "Rejecting malformed request");
                            let writer = ResponseWriter::new(&Response::bad_request());
                            ConnectionState::Writing(writer, false)
                        }
                    };
                }

                ConnectionState::Processing(req) => {
                    let (response, keep_alive) = self.handle_request(req).await;

                    let writer = ResponseWriter::new(&response);
                    self.state = ConnectionState::Writing(writer, keep_alive);
                }

                ConnectionState::Writing(mut writer, keep_alive) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    self.state = if keep_alive {
                        ConnectionState::Reading // go back for next request
                    } else {
                        ConnectionState::Closed
                    };
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads the next request.
    ///
    /// The outer error is an I/O failure on the socket; the inner one a
    /// request that could not be parsed. `Ok(Ok(None))` means the client
    /// closed the connection between requests.
    pub async fn read_request(&mut self) -> anyhow::Result<Result<Option<Request>, ParseError>> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.advance(consumed);
                    return Ok(Ok(Some(request)));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => return Ok(Err(e)),
            }

            self.buffer.reserve(4096);
            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                if self.buffer.is_empty() {
                    // Client closed connection
                    return Ok(Ok(None));
                }
                return Err(anyhow::anyhow!("client closed connection mid-request"));
            }
        }
    }

    /// Runs the forwarder and decides whether the connection stays open.
    ///
    /// A failed fetch becomes a 502; the forwarder itself never substitutes
    /// a response.
    async fn handle_request(&self, req: Request) -> (Response, bool) {
        let client_keep_alive = req.keep_alive();
        let method = req.method.clone();
        let path = req.path.clone();

        match self.forwarder.forward(req).await {
            Ok(response) => {
                tracing::debug!(
                    method = %method,
                    path = %path,
                    status = response.status.as_u16(),
                    "Request forwarded"
                );
                let keep_alive = client_keep_alive && response.allows_keep_alive();
                (response, keep_alive)
            }
            Err(e) => {
                tracing::error!(
                    method = %method,
                    path = %path,
                    error = %e,
                    "Downstream fetch failed"
                );
                (Response::bad_gateway(), false)
            }
        }
    }
}
