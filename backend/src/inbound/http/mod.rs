//! HTTP inbound adapter exposing the match page endpoint and health probes.

pub mod error;
pub mod health;
pub mod matches;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
