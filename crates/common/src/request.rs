//! Management API command encoding
//!
//! Every call to the cluster is a GET on `/rest/` with one `request` query
//! parameter holding a command. The cluster historically accepts a
//! single-quoted, unquoted-key dialect of JSON; [`RequestFormat::Legacy`]
//! reproduces it byte for byte, [`RequestFormat::Json`] sends the same
//! command through `serde_json`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::AccessBinding;

/// Category every ACL command is scoped to
pub const CATEGORY: &str = "VirtualDiskManagement";

/// Characters that break out of a single-quoted legacy value
const LEGACY_RESERVED: &[char] = &['\'', '\\', '{', '}', '[', ']'];

/// Encoding used for the `request` query parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestFormat {
    #[default]
    Legacy,
    Json,
}

impl FromStr for RequestFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(RequestFormat::Legacy),
            "json" => Ok(RequestFormat::Json),
            other => Err(format!("unknown request format '{}' (expected legacy or json)", other)),
        }
    }
}

impl fmt::Display for RequestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestFormat::Legacy => write!(f, "legacy"),
            RequestFormat::Json => write!(f, "json"),
        }
    }
}

/// ACL commands understood by the management API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AclCommand {
    /// Grant a host/address access to a virtual disk
    Persist(AccessBinding),
    /// Look up the hosts currently bound to a virtual disk
    Info { vdisk: String },
    /// Revoke a host/address grant on a virtual disk
    Remove {
        vdisk: String,
        host: String,
        address: String,
    },
}

impl AclCommand {
    pub fn persist(binding: &AccessBinding) -> Self {
        AclCommand::Persist(binding.clone())
    }

    pub fn info(vdisk: impl Into<String>) -> Self {
        AclCommand::Info { vdisk: vdisk.into() }
    }

    /// Removal only names the identifying fields; the access type is not sent
    pub fn remove(binding: &AccessBinding) -> Self {
        AclCommand::Remove {
            vdisk: binding.vdisk.clone(),
            host: binding.host.clone(),
            address: binding.address.clone(),
        }
    }

    /// Command type as named by the management API
    pub fn kind(&self) -> &'static str {
        match self {
            AclCommand::Persist(_) => "PersistACLAccess",
            AclCommand::Info { .. } => "GetACLInformation",
            AclCommand::Remove { .. } => "RemoveACLAccess",
        }
    }

    /// Render the command for the `request` query parameter
    pub fn encode(&self, session_id: &str, format: RequestFormat) -> Result<String> {
        match format {
            RequestFormat::Legacy => self.encode_legacy(session_id),
            RequestFormat::Json => self.encode_json(session_id),
        }
    }

    fn encode_legacy(&self, session_id: &str) -> Result<String> {
        legacy_safe("sessionId", session_id)?;

        let encoded = match self {
            AclCommand::Persist(b) => {
                legacy_safe("vdisk", &b.vdisk)?;
                legacy_safe("host", &b.host)?;
                legacy_safe("address", &b.address)?;
                legacy_safe("type", &b.access_type)?;
                format!(
                    "{{type:{}, category:{}, params:{{virtualDisks:['{}'], host:'{}', address:'{}', type:'{}'}}, sessionId:'{}'}}",
                    self.kind(), CATEGORY, b.vdisk, b.host, b.address, b.access_type, session_id
                )
            }
            AclCommand::Info { vdisk } => {
                legacy_safe("vdisk", vdisk)?;
                format!(
                    "{{type:{},category:{},params:{{virtualDisk:'{}'}},sessionId:'{}'}}",
                    self.kind(), CATEGORY, vdisk, session_id
                )
            }
            AclCommand::Remove { vdisk, host, address } => {
                legacy_safe("vdisk", vdisk)?;
                legacy_safe("host", host)?;
                legacy_safe("address", address)?;
                format!(
                    "{{type:{}, category:{}, params:{{virtualDisk:'{}', host:'{}', address:['{}']}}, sessionId: '{}'}}",
                    self.kind(), CATEGORY, vdisk, host, address, session_id
                )
            }
        };

        Ok(encoded)
    }

    fn encode_json(&self, session_id: &str) -> Result<String> {
        let params = match self {
            AclCommand::Persist(b) => Params::Persist {
                virtual_disks: [b.vdisk.as_str()],
                host: &b.host,
                address: &b.address,
                access_type: &b.access_type,
            },
            AclCommand::Info { vdisk } => Params::Info { virtual_disk: vdisk },
            AclCommand::Remove { vdisk, host, address } => Params::Remove {
                virtual_disk: vdisk,
                host,
                address: [address.as_str()],
            },
        };

        let envelope = Envelope {
            kind: self.kind(),
            category: CATEGORY,
            params,
            session_id,
        };

        Ok(serde_json::to_string(&envelope)?)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    category: &'a str,
    params: Params<'a>,
    session_id: &'a str,
}

#[derive(Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
enum Params<'a> {
    Persist {
        virtual_disks: [&'a str; 1],
        host: &'a str,
        address: &'a str,
        #[serde(rename = "type")]
        access_type: &'a str,
    },
    Info {
        virtual_disk: &'a str,
    },
    Remove {
        virtual_disk: &'a str,
        host: &'a str,
        address: [&'a str; 1],
    },
}

fn legacy_safe(field: &str, value: &str) -> Result<()> {
    match value.chars().find(|c| LEGACY_RESERVED.contains(c)) {
        Some(c) => Err(Error::InvalidField {
            field: field.to_string(),
            reason: format!("character '{}' cannot be sent in a legacy request", c),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding() -> AccessBinding {
        AccessBinding::new("vd1", "h1", "10.0.0.1", "rw")
    }

    #[test]
    fn test_legacy_persist_is_byte_exact() {
        let encoded = AclCommand::persist(&binding())
            .encode("s3cr3t", RequestFormat::Legacy)
            .unwrap();
        assert_eq!(
            encoded,
            "{type:PersistACLAccess, category:VirtualDiskManagement, params:{virtualDisks:['vd1'], host:'h1', address:'10.0.0.1', type:'rw'}, sessionId:'s3cr3t'}"
        );
    }

    #[test]
    fn test_legacy_info_is_byte_exact() {
        let encoded = AclCommand::info("vd1")
            .encode("s3cr3t", RequestFormat::Legacy)
            .unwrap();
        assert_eq!(
            encoded,
            "{type:GetACLInformation,category:VirtualDiskManagement,params:{virtualDisk:'vd1'},sessionId:'s3cr3t'}"
        );
    }

    #[test]
    fn test_legacy_remove_is_byte_exact() {
        let encoded = AclCommand::remove(&binding())
            .encode("s3cr3t", RequestFormat::Legacy)
            .unwrap();
        assert_eq!(
            encoded,
            "{type:RemoveACLAccess, category:VirtualDiskManagement, params:{virtualDisk:'vd1', host:'h1', address:['10.0.0.1']}, sessionId: 's3cr3t'}"
        );
    }

    #[test]
    fn test_legacy_rejects_quote_in_value() {
        let mut b = binding();
        b.host = "h1', evil:'x".to_string();
        let err = AclCommand::persist(&b)
            .encode("s", RequestFormat::Legacy)
            .unwrap_err();
        match err {
            Error::InvalidField { field, .. } => assert_eq!(field, "host"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_legacy_rejects_brace_in_session() {
        let err = AclCommand::info("vd1")
            .encode("abc}", RequestFormat::Legacy)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidField { ref field, .. } if field == "sessionId"));
    }

    #[test]
    fn test_json_persist_shape() {
        let encoded = AclCommand::persist(&binding())
            .encode("s3cr3t", RequestFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["type"], "PersistACLAccess");
        assert_eq!(value["category"], "VirtualDiskManagement");
        assert_eq!(value["params"]["virtualDisks"][0], "vd1");
        assert_eq!(value["params"]["type"], "rw");
        assert_eq!(value["sessionId"], "s3cr3t");
    }

    #[test]
    fn test_json_escapes_quotes_and_braces() {
        let mut b = binding();
        b.host = "h'{1}\"".to_string();
        let encoded = AclCommand::remove(&b)
            .encode("s", RequestFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["params"]["host"], "h'{1}\"");
        assert_eq!(value["params"]["address"][0], "10.0.0.1");
        assert!(value["params"].get("type").is_none());
    }

    #[test]
    fn test_request_format_parse() {
        assert_eq!("JSON".parse::<RequestFormat>().unwrap(), RequestFormat::Json);
        assert_eq!("legacy".parse::<RequestFormat>().unwrap(), RequestFormat::Legacy);
        assert!("xml".parse::<RequestFormat>().is_err());
        assert_eq!(RequestFormat::default(), RequestFormat::Legacy);
    }
}
