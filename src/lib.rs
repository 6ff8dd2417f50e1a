//! Chromium release calendar library
//!
//! The acquisition and caching pipeline behind the `chromecal` binary: an
//! upstream dashboard client with retry/backoff, an on-disk cache store,
//! per-source normalizers, a shared refresh orchestrator, and the query
//! facade the presentation layer calls.

pub mod cache;
pub mod calendar;
pub mod cli;
pub mod data;
pub mod refresh;
pub mod upstream;
