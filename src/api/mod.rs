//! Provides the client and request building blocks for the LocationIQ API.
//!
//! Includes:
//! - `locationiq`: the async client and its shared fetch-and-validate routine.
//! - `params`: normalization of loosely-shaped arguments per endpoint.
//! - `query`: the query mapping and its serialization.

mod locationiq;
mod params;
mod query;


pub use locationiq::*;
pub use params::*;
pub use query::QueryParams;
