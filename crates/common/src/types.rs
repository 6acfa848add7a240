//! Core types for Hedvig access bindings

use serde::{Deserialize, Serialize};

/// Prefix of the external key the host runtime tracks bindings by
pub const ACCESS_ID_PREFIX: &str = "access";

/// An ACL grant letting a host/address pair reach a virtual disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessBinding {
    /// Virtual disk name in the cluster's management namespace
    pub vdisk: String,
    /// Host the disk is exported to
    pub host: String,
    /// Network address of the initiator
    pub address: String,
    /// Access type, enumerated by the cluster (not validated locally)
    #[serde(rename = "type")]
    pub access_type: String,
}

impl AccessBinding {
    pub fn new(
        vdisk: impl Into<String>,
        host: impl Into<String>,
        address: impl Into<String>,
        access_type: impl Into<String>,
    ) -> Self {
        Self {
            vdisk: vdisk.into(),
            host: host.into(),
            address: address.into(),
            access_type: access_type.into(),
        }
    }

    /// External identifier: `access-<vdisk>-<host>-<address>`
    pub fn id(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            ACCESS_ID_PREFIX, self.vdisk, self.host, self.address
        )
    }

    /// Names of the fields that differ from `other`, in declaration order
    pub fn changed_fields(&self, other: &AccessBinding) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.vdisk != other.vdisk {
            changed.push("vdisk");
        }
        if self.host != other.host {
            changed.push("host");
        }
        if self.address != other.address {
            changed.push("address");
        }
        if self.access_type != other.access_type {
            changed.push("type");
        }
        changed
    }
}

/// Locally cached view of a binding, keyed by its external identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessState {
    pub id: String,
    #[serde(flatten)]
    pub binding: AccessBinding,
}

impl AccessState {
    /// State for a freshly granted binding
    pub fn granted(binding: AccessBinding) -> Self {
        Self {
            id: binding.id(),
            binding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_joins_identifying_fields() {
        let binding = AccessBinding::new("vd1", "h1", "10.0.0.1", "rw");
        assert_eq!(binding.id(), "access-vd1-h1-10.0.0.1");
    }

    #[test]
    fn test_id_ignores_access_type() {
        let rw = AccessBinding::new("vd1", "h1", "10.0.0.1", "rw");
        let ro = AccessBinding::new("vd1", "h1", "10.0.0.1", "ro");
        assert_eq!(rw.id(), ro.id());
    }

    #[test]
    fn test_changed_fields() {
        let old = AccessBinding::new("vd1", "h1", "10.0.0.1", "rw");
        assert!(old.changed_fields(&old.clone()).is_empty());

        let new = AccessBinding::new("vd1", "h2", "10.0.0.1", "ro");
        assert_eq!(old.changed_fields(&new), vec!["host", "type"]);
    }

    #[test]
    fn test_state_serializes_type_attribute() {
        let state = AccessState::granted(AccessBinding::new("vd1", "h1", "10.0.0.1", "rw"));
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["id"], "access-vd1-h1-10.0.0.1");
        assert_eq!(json["type"], "rw");
        assert_eq!(json["vdisk"], "vd1");
    }
}
