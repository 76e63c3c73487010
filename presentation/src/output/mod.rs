//! Rendering of debate results

pub mod console;
pub mod formatter;
