//! Relay - single-binding request forwarder
//!
//! Accepts HTTP requests and relays each one unmodified to one statically
//! configured downstream service, returning that service's response verbatim.

pub mod config;
pub mod http;
pub mod proxy;
pub mod server;
