//! Core domain concepts shared across all subdomains.
//!
//! - [`persona::PersonaId`]: a debate participant
//! - [`topic::Topic`]: the validated proposition under debate
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod persona;
pub mod string;
pub mod topic;
