//! Hedvig Common Library
//!
//! Shared types, errors and the management API wire format used by the
//! Hedvig access provider.

pub mod error;
pub mod request;
pub mod response;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use request::{AclCommand, RequestFormat};
pub use response::{AclInformation, AclRecord, Initiator};
pub use types::*;
