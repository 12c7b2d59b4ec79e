//! Defines the data structures used to present geocoding results.
//!
//! Payloads are returned to callers verbatim; these models are a read-only view
//! over them for display purposes.

mod place;

pub use place::*;
