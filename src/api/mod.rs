//! Backend access.

pub mod client;

pub use client::{Backend, Endpoints, FetchError, FetchReason, HttpBackend};
