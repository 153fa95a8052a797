//! Brewdesk HTTP client
//!
//! Every call to the Brewdesk backend goes through [`client::BrewClient`],
//! which attaches the stored bearer token, recovers from an expired access
//! token with a single refresh-and-retry, and ends the session when the
//! refresh token is gone or rejected.

#[macro_use]
extern crate tracing;

pub mod client;
pub mod config;
pub mod types;

pub use client::{BrewClient, BrewClientBuilder, ClientError, PendingRequest, SessionExpiryHandler};
pub use config::ClientConfig;
