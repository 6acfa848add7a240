//! Resource Implementations
//!
//! Adapts the CRUD operations of each resource type to dynamic values.

pub mod access;

use async_trait::async_trait;
use hedvig_common::Result;

use crate::client::HedvigClient;
use crate::schema::Schema;
use crate::state::DynamicValue;

/// Trait for resource operations
#[async_trait]
pub trait Resource {
    /// Resource type name
    fn type_name() -> &'static str;

    fn schema() -> Schema;

    /// Create a new resource
    async fn create(client: &HedvigClient, config: &DynamicValue) -> Result<DynamicValue>;

    /// Read an existing resource; a null value means it is gone
    async fn read(client: &HedvigClient, state: &DynamicValue) -> Result<DynamicValue>;

    /// Update an existing resource
    async fn update(
        client: &HedvigClient,
        state: &DynamicValue,
        config: &DynamicValue,
    ) -> Result<DynamicValue>;

    /// Delete a resource
    async fn delete(client: &HedvigClient, state: &DynamicValue) -> Result<()>;
}
