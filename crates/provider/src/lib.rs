//! Hedvig Terraform Provider
//!
//! Manages virtual disk ACL bindings on a Hedvig cluster through its HTTP
//! management API.

pub mod access;
pub mod client;
pub mod config;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod session;
pub mod state;

pub use access::{AccessControl, AccessManager};
pub use client::HedvigClient;
pub use config::ProviderConfig;
pub use provider::HedvigProvider;
pub use session::{SessionProvider, StaticSession};
