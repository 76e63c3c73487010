//! Port definitions
//!
//! Interfaces the application layer depends on; adapters live in the
//! infrastructure and presentation layers.

pub mod crystallizer;
pub mod event_sink;
pub mod turn_generator;
