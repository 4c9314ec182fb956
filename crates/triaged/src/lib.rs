//! Triage daemon library - exposes modules for testing.

pub mod booking;
pub mod config;
pub mod dispatch;
pub mod intake;
pub mod queue;
pub mod routes;
pub mod scoring;
pub mod seed;
pub mod server;
pub mod shifts;
pub mod store;
pub mod triage;
