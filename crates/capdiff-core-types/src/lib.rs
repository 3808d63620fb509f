//! Core types shared across capdiff facilities
//!
//! This crate provides foundational types used by the error, logging and
//! inventory layers:
//!
//! - **Correlation types**: RunId tagging every event of one capture or diff run
//! - **Sensitive data**: Sensitive<T> marker for credential redaction
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RunId;
pub use sensitive::Sensitive;
