//! Inbound adapters: surfaces through which callers drive the domain.

pub mod http;
