//! Virtual disk access management
//!
//! Grant, read, update and revoke of ACL bindings against the management
//! API. The cluster holds the authoritative state; every operation ends by
//! reading it back except revoke.

use async_trait::async_trait;
use hedvig_common::{
    AccessBinding, AccessState, AclCommand, AclInformation, Error, Result,
};
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::client::HedvigClient;

/// Capability set for an ACL binding
#[async_trait]
pub trait AccessControl: Send + Sync {
    /// Grant access and return the reconciled state
    async fn grant(&self, binding: &AccessBinding) -> Result<AccessState>;

    /// Refresh `state` from the cluster; `None` when the disk is gone
    async fn read(&self, state: &AccessState) -> Result<Option<AccessState>>;

    /// Move `prior` to `planned` by revoking and granting again
    async fn update(&self, prior: &AccessState, planned: &AccessBinding)
        -> Result<Option<AccessState>>;

    /// Revoke the binding
    async fn revoke(&self, state: &AccessState) -> Result<()>;
}

/// ACL operations over a management API client
pub struct AccessManager<'a> {
    client: &'a HedvigClient,
}

impl<'a> AccessManager<'a> {
    pub fn new(client: &'a HedvigClient) -> Self {
        Self { client }
    }

    async fn persist(&self, binding: &AccessBinding) -> Result<()> {
        self.client
            .send(&AclCommand::persist(binding))
            .await?
            .ensure_success()?
            .body()
            .await?;
        Ok(())
    }

    async fn remove(&self, binding: &AccessBinding) -> Result<()> {
        self.client
            .send(&AclCommand::remove(binding))
            .await?
            .ensure_success()?
            .body()
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AccessControl for AccessManager<'_> {
    async fn grant(&self, binding: &AccessBinding) -> Result<AccessState> {
        info!(vdisk = %binding.vdisk, host = %binding.host, address = %binding.address, "Granting access");
        self.persist(binding).await?;

        let state = AccessState::granted(binding.clone());
        self.read(&state).await?.ok_or_else(|| Error::NotFound {
            kind: "virtual disk".to_string(),
            id: binding.vdisk.clone(),
        })
    }

    async fn read(&self, state: &AccessState) -> Result<Option<AccessState>> {
        let vdisk = &state.binding.vdisk;
        debug!(id = %state.id, "Reading access");

        let response = self.client.send(&AclCommand::info(vdisk)).await?;
        if response.status == StatusCode::NOT_FOUND {
            info!(id = %state.id, "Virtual disk no longer exists");
            return Ok(None);
        }

        let body = response.ensure_success()?.body().await?;
        let information = AclInformation::from_slice(&body)?;
        let host = information.first_host(vdisk)?;

        if host != state.binding.host {
            warn!(id = %state.id, old = %state.binding.host, new = %host, "Host changed remotely");
        }

        let mut refreshed = state.clone();
        refreshed.binding.host = host.to_string();
        Ok(Some(refreshed))
    }

    async fn update(
        &self,
        prior: &AccessState,
        planned: &AccessBinding,
    ) -> Result<Option<AccessState>> {
        let changed = prior.binding.changed_fields(planned);
        if changed.is_empty() {
            return self.read(prior).await;
        }

        info!(id = %prior.id, ?changed, "Replacing access");
        debug!(
            "old vdisk: {}, old host: {}, old address: {}",
            prior.binding.vdisk, prior.binding.host, prior.binding.address
        );

        self.remove(&prior.binding).await?;
        self.persist(planned).await.map_err(|e| Error::Revoked {
            id: prior.id.clone(),
            source: Box::new(e),
        })?;
        self.read(&AccessState::granted(planned.clone())).await
    }

    async fn revoke(&self, state: &AccessState) -> Result<()> {
        info!(id = %state.id, "Revoking access");
        self.remove(&state.binding).await
    }
}
