//! HTTP client library for the signal service.
//!
//! Provides REST access to the health, search, signal, and lucky-pick
//! endpoints, plus the bounded, cancellable startup health check.

pub mod health;
pub mod rest;

pub use health::check_health;
pub use rest::SignalRestClient;
