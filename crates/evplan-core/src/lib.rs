//! Core library for evplan: the plan schema, plan sources and the fallback
//! chain, request handling, the HTTP client and the client-side plan store.

pub mod client;
pub mod envelope;
pub mod plan;
pub mod service;
pub mod source;
pub mod store;
