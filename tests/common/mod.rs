//! Shared utilities for forwarding tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use relay::config::DownstreamConfig;
use relay::http::parser::{ParseError, parse_http_request};
use relay::http::request::Request;
use relay::proxy::Binding;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

type Responder = Arc<dyn Fn(&Request) -> Vec<u8> + Send + Sync>;

/// A loopback downstream that records every request it receives.
pub struct MockDownstream {
    pub addr: SocketAddr,
    received: Arc<Mutex<Vec<Vec<u8>>>>,
    hits: Arc<AtomicUsize>,
}

impl MockDownstream {
    /// Raw bytes of each request received, in arrival order.
    pub fn received(&self) -> Vec<Vec<u8>> {
        self.received.lock().unwrap().clone()
    }

    /// Number of connections accepted.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn binding(&self) -> Binding {
        binding_for(self.addr)
    }
}

pub fn binding_for(addr: SocketAddr) -> Binding {
    Binding::new(&DownstreamConfig {
        url: format!("http://{addr}"),
        name: Some("mock".to_string()),
    })
    .unwrap()
}

/// Start a downstream that answers every request with fixed bytes and then
/// closes the connection.
pub async fn start_mock_downstream(response: &'static [u8]) -> MockDownstream {
    start_programmable_downstream(move |_| response.to_vec()).await
}

/// Start a downstream whose response bytes are computed from the request.
pub async fn start_programmable_downstream<F>(f: F) -> MockDownstream
where
    F: Fn(&Request) -> Vec<u8> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let received = Arc::new(Mutex::new(Vec::new()));
    let hits = Arc::new(AtomicUsize::new(0));
    let responder: Responder = Arc::new(f);

    let (rx, counter) = (received.clone(), hits.clone());
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            let (rx, responder) = (rx.clone(), responder.clone());
            tokio::spawn(async move {
                serve_one(socket, rx, responder).await;
            });
        }
    });

    MockDownstream {
        addr,
        received,
        hits,
    }
}

async fn serve_one(mut socket: TcpStream, received: Arc<Mutex<Vec<Vec<u8>>>>, responder: Responder) {
    let mut buf = Vec::new();
    let request = loop {
        match parse_http_request(&buf) {
            Ok((request, consumed)) => {
                received.lock().unwrap().push(buf[..consumed].to_vec());
                break request;
            }
            Err(ParseError::Incomplete) => {}
            Err(_) => return,
        }

        let mut chunk = [0u8; 1024];
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    };

    let response = responder(&request);
    let _ = socket.write_all(&response).await;
    let _ = socket.shutdown().await;
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
