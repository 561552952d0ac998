//! OKR objective lifecycle backend.
//!
//! Hexagonal layout: [`domain`] holds entities, ports and the lifecycle
//! service; [`inbound`] adapts HTTP requests onto the driving ports;
//! [`outbound`] implements the driven ports against PostgreSQL or memory.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
