//! HTTP/1.1 protocol implementation.
//!
//! This module carries both sides of the relay: the inbound server that
//! accepts client requests and the message codec used to talk to the
//! downstream. Messages are kept in wire form (ordered headers, raw bodies)
//! so they can be re-emitted unchanged.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection request/response state machine
//! - **`parser`**: Parses requests and responses from byte buffers, including body framing
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes requests and responses back to bytes
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for incoming request data
//!        └──────┬──────┘
//!               │ Request received
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Forward downstream, await response
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (same connection)
//!               └─ Close → Closed
//! ```

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
