//! Request forwarding
//!
//! This module holds the forwarder, the static downstream binding it relays
//! to, and the HTTP transport that performs the downstream fetch.

pub mod binding;
pub mod error;
pub mod forwarder;
pub mod upstream;

pub use binding::Binding;
pub use error::ForwardError;
pub use forwarder::{Downstream, Forwarder};
pub use upstream::HttpDownstream;
