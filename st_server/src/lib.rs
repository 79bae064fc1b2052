//! HTTP server for shuttle_tourney.
//!
//! Exposes tournament, roster, draw and match management over a JSON API,
//! with configuration from the environment, structured logging and optional
//! Prometheus metrics.

pub mod api;
pub mod config;
pub mod demo;
pub mod logging;
pub mod metrics;
