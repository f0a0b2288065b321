//! Movie recommendations from a precomputed similarity matrix.
//!
//! The catalog and matrix are loaded once at startup by [`services::loader`],
//! wrapped in a [`services::LookupEngine`] and served over HTTP by [`api`].

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
