//! Inbound adapters translating external requests into domain service calls.
//!
//! Framework details stay at this edge; the domain only sees port requests.

pub mod http;
