//! Progress reporting while a debate runs

pub mod reporter;
