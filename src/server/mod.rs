//! Inbound server: the accept loop that hands connections to the HTTP layer.

pub mod listener;
