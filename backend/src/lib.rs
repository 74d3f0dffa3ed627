//! Student review backend library modules.
//!
//! The crate is organised hexagonally: `domain` holds the typed model,
//! ports, and services; `inbound` adapts HTTP onto the driving ports;
//! `outbound` implements the driven ports; `middleware` carries
//! cross-cutting request concerns.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use doc::ApiDoc;
pub use middleware::Trace;
