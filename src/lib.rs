// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod analysis;
pub mod cache;
pub mod config;
pub mod fetch;
pub mod model;
pub mod pricing;
pub mod suggest;
