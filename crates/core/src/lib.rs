//! Core domain, cache and storage contracts for academia.
//!
//! Everything in this crate is backend-agnostic: the concrete SQLite store,
//! cache backends and the cache-aside decorator live in the `academia` crate.

pub mod academic;
pub mod cache;
pub mod retry;
pub mod storage;
