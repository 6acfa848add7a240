//! Access resource handler for Terraform

use async_trait::async_trait;
use hedvig_common::{AccessBinding, AccessState, Error, Result};

use super::Resource;
use crate::access::{AccessControl, AccessManager};
use crate::client::HedvigClient;
use crate::schema::{self, Schema};
use crate::state::{
    get_optional_string_attr, get_string_attr, make_state, string_value, DynamicValue,
};

pub struct AccessResource;

#[async_trait]
impl Resource for AccessResource {
    fn type_name() -> &'static str {
        "hedvig_access"
    }

    fn schema() -> Schema {
        schema::access_schema()
    }

    async fn create(client: &HedvigClient, config: &DynamicValue) -> Result<DynamicValue> {
        let binding = binding_from_value(config)?;
        let state = AccessManager::new(client).grant(&binding).await?;
        Ok(state_to_value(&state))
    }

    async fn read(client: &HedvigClient, state: &DynamicValue) -> Result<DynamicValue> {
        let current = state_from_value(state)?;
        let refreshed = AccessManager::new(client).read(&current).await?;
        Ok(refreshed.as_ref().map(state_to_value).unwrap_or_default())
    }

    async fn update(
        client: &HedvigClient,
        state: &DynamicValue,
        config: &DynamicValue,
    ) -> Result<DynamicValue> {
        let prior = state_from_value(state)?;
        let planned = binding_from_value(config)?;
        let updated = AccessManager::new(client).update(&prior, &planned).await?;
        Ok(updated.as_ref().map(state_to_value).unwrap_or_default())
    }

    async fn delete(client: &HedvigClient, state: &DynamicValue) -> Result<()> {
        let current = state_from_value(state)?;
        AccessManager::new(client).revoke(&current).await
    }
}

fn required_attr(value: &DynamicValue, key: &str) -> Result<String> {
    get_optional_string_attr(value, key).ok_or_else(|| Error::MissingAttribute(key.to_string()))
}

/// Binding declared in configuration; all four attributes are required
pub fn binding_from_value(value: &DynamicValue) -> Result<AccessBinding> {
    Ok(AccessBinding {
        vdisk: required_attr(value, "vdisk")?,
        host: required_attr(value, "host")?,
        address: required_attr(value, "address")?,
        access_type: required_attr(value, "type")?,
    })
}

/// Stored state; a missing id is rebuilt from the binding
pub fn state_from_value(value: &DynamicValue) -> Result<AccessState> {
    let binding = binding_from_value(value)?;
    let id = match get_string_attr(value, "id") {
        id if id.is_empty() => binding.id(),
        id => id,
    };
    Ok(AccessState { id, binding })
}

pub fn state_to_value(state: &AccessState) -> DynamicValue {
    make_state(vec![
        ("id", string_value(&state.id)),
        ("vdisk", string_value(&state.binding.vdisk)),
        ("host", string_value(&state.binding.host)),
        ("address", string_value(&state.binding.address)),
        ("type", string_value(&state.binding.access_type)),
    ])
}
