//! Actix middleware shared across inbound surfaces.

pub mod trace;

pub use trace::Trace;
