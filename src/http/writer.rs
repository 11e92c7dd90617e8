use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::request::Request;
use crate::http::response::Response;

/// Serializes a response exactly as held: status line, headers in order, raw body.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128 + resp.body.len());

    // Status line
    let status_line = format!("{} {} ", resp.version, resp.status.as_u16());
    buf.extend_from_slice(status_line.as_bytes());
    buf.extend_from_slice(&resp.reason);
    buf.extend_from_slice(b"\r\n");

    write_headers(&mut buf, &resp.headers);
    buf.extend_from_slice(&resp.body);

    buf
}

/// Serializes a request exactly as held: request line, headers in order, raw body.
pub fn serialize_request(req: &Request) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128 + req.body.len());

    let request_line = format!("{} {} {}\r\n", req.method, req.path, req.version);
    buf.extend_from_slice(request_line.as_bytes());

    write_headers(&mut buf, &req.headers);
    buf.extend_from_slice(&req.body);

    buf
}

fn write_headers(buf: &mut Vec<u8>, headers: &[(String, Vec<u8>)]) {
    for (k, v) in headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v);
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
