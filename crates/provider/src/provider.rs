//! Hedvig Provider Implementation
//!
//! Dispatches plugin-host requests to resource handlers and turns their
//! errors into diagnostics.

use std::collections::BTreeMap;
use std::sync::Arc;

use hedvig_common::{Error, Result};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::client::HedvigClient;
use crate::config::ProviderConfig;
use crate::resources::{access::AccessResource, Resource};
use crate::schema::{self, Schema};
use crate::state::DynamicValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Problem reported back to the plugin host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(summary, detail)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderSchemaResponse {
    pub provider: Schema,
    pub resource_schemas: BTreeMap<String, Schema>,
}

#[derive(Debug, Clone, Default)]
pub struct ReadResponse {
    /// `None` when the resource no longer exists
    pub new_state: Option<DynamicValue>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Default)]
pub struct PlanResponse {
    pub planned_state: Option<DynamicValue>,
    pub requires_replace: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Default)]
pub struct ApplyResponse {
    pub new_state: Option<DynamicValue>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ApplyResponse {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }
}

/// Hedvig provider
#[derive(Default)]
pub struct HedvigProvider {
    client: Arc<RwLock<Option<HedvigClient>>>,
}

impl HedvigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider with an already configured client
    pub fn with_client(client: HedvigClient) -> Self {
        Self {
            client: Arc::new(RwLock::new(Some(client))),
        }
    }

    async fn get_client(&self) -> Result<HedvigClient> {
        self.client
            .read()
            .await
            .clone()
            .ok_or_else(|| Error::InvalidConfig("provider is not configured".to_string()))
    }

    pub fn get_provider_schema(&self) -> ProviderSchemaResponse {
        info!("GetProviderSchema called");
        ProviderSchemaResponse {
            provider: schema::provider_schema(),
            resource_schemas: [(AccessResource::type_name().to_string(), AccessResource::schema())]
                .into_iter()
                .collect(),
        }
    }

    pub async fn configure_provider(&self, config: &DynamicValue) -> Vec<Diagnostic> {
        info!("ConfigureProvider called");

        let client = ProviderConfig::from_dynamic(config).and_then(|c| HedvigClient::from_config(&c));
        match client {
            Ok(client) => {
                info!(node = client.node(), format = %client.format(), "Provider configured");
                *self.client.write().await = Some(client);
                vec![]
            }
            Err(e) => {
                error!("Failed to configure provider: {}", e);
                vec![Diagnostic::error("Invalid provider configuration", e.to_string())]
            }
        }
    }

    pub fn validate_resource_config(&self, type_name: &str, config: &DynamicValue) -> Vec<Diagnostic> {
        debug!("ValidateResourceConfig called for {}", type_name);

        let schema = match type_name {
            "hedvig_access" => AccessResource::schema(),
            _ => {
                return vec![Diagnostic::error(
                    "Unknown resource type",
                    Error::UnknownResourceType(type_name.to_string()).to_string(),
                )]
            }
        };

        schema
            .missing_required(config)
            .into_iter()
            .map(|name| {
                Diagnostic::error(
                    "Missing required argument",
                    format!("The argument \"{}\" is required", name),
                )
            })
            .collect()
    }

    /// Every attribute change is applied through update, so nothing forces replacement
    pub fn plan_resource_change(
        &self,
        type_name: &str,
        proposed_new_state: Option<DynamicValue>,
    ) -> PlanResponse {
        debug!("PlanResourceChange called for {}", type_name);
        PlanResponse {
            planned_state: proposed_new_state,
            requires_replace: vec![],
            diagnostics: vec![],
        }
    }

    pub async fn read_resource(&self, type_name: &str, current_state: &DynamicValue) -> Result<ReadResponse> {
        info!("ReadResource called for {}", type_name);

        let client = self.get_client().await?;
        let new_state = match type_name {
            "hedvig_access" => AccessResource::read(&client, current_state).await,
            _ => return Err(Error::UnknownResourceType(type_name.to_string())),
        };

        Ok(match new_state {
            Ok(state) if state.is_null() => ReadResponse::default(),
            Ok(state) => ReadResponse {
                new_state: Some(state),
                diagnostics: vec![],
            },
            Err(e) => ReadResponse {
                new_state: Some(current_state.clone()),
                diagnostics: vec![Diagnostic::error("Failed to read resource", e.to_string())],
            },
        })
    }

    pub async fn apply_resource_change(
        &self,
        type_name: &str,
        prior_state: Option<&DynamicValue>,
        planned_state: Option<&DynamicValue>,
    ) -> Result<ApplyResponse> {
        info!("ApplyResourceChange called for {}", type_name);

        if type_name != AccessResource::type_name() {
            return Err(Error::UnknownResourceType(type_name.to_string()));
        }

        let client = self.get_client().await?;
        let prior_state = prior_state.filter(|s| !s.is_null());
        let planned_state = planned_state.filter(|s| !s.is_null());

        let result = match (prior_state, planned_state) {
            // Create
            (None, Some(planned)) => AccessResource::create(&client, planned).await,
            // Delete
            (Some(prior), None) => AccessResource::delete(&client, prior)
                .await
                .map(|_| DynamicValue::Null),
            // Update
            (Some(prior), Some(planned)) => AccessResource::update(&client, prior, planned).await,
            // No change
            (None, None) => Ok(DynamicValue::Null),
        };

        Ok(match result {
            Ok(new_state) if new_state.is_null() && planned_state.is_some() => ApplyResponse {
                new_state: None,
                diagnostics: vec![Diagnostic::warning(
                    "Resource vanished after apply",
                    "The virtual disk could not be found when reading the binding back",
                )],
            },
            Ok(new_state) => ApplyResponse {
                new_state: (!new_state.is_null()).then_some(new_state),
                diagnostics: vec![],
            },
            Err(e) => {
                error!("Failed to apply {} change: {}", type_name, e);
                // A failed replacement has already removed the prior grant
                let new_state = match e {
                    Error::Revoked { .. } => None,
                    _ => prior_state.cloned(),
                };
                ApplyResponse {
                    new_state,
                    diagnostics: vec![Diagnostic::error(
                        "Failed to apply resource change",
                        e.to_string(),
                    )],
                }
            }
        })
    }
}
