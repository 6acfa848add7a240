//! Management API response envelopes

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Reply to `GetACLInformation`
///
/// Every field defaults when absent; the cluster omits most of them on
/// partial replies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AclInformation {
    pub request_id: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub result: Vec<AclRecord>,
}

/// One host bound to the disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AclRecord {
    pub host: String,
    pub initiator: Vec<Initiator>,
}

/// A client endpoint the cluster has seen accessing the disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Initiator {
    pub ip: String,
    pub name: String,
}

impl AclInformation {
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Host of the first record
    pub fn first_host(&self, vdisk: &str) -> Result<&str> {
        self.result
            .first()
            .map(|r| r.host.as_str())
            .ok_or_else(|| Error::EmptyResult {
                vdisk: vdisk.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_envelope() {
        let body = br#"{
            "requestId": "42",
            "status": "ok",
            "type": "GetACLInformation",
            "result": [
                {"host": "h1", "initiator": [{"ip": "10.0.0.1", "name": "iqn.h1"}]},
                {"host": "h2", "initiator": []}
            ]
        }"#;
        let info = AclInformation::from_slice(body).unwrap();
        assert_eq!(info.request_id, "42");
        assert_eq!(info.kind, "GetACLInformation");
        assert_eq!(info.result.len(), 2);
        assert_eq!(info.result[0].initiator[0].ip, "10.0.0.1");
        assert_eq!(info.first_host("vd1").unwrap(), "h1");
    }

    #[test]
    fn test_decode_minimal_result() {
        let info = AclInformation::from_slice(br#"{"result":[{"host":"h1"}]}"#).unwrap();
        assert!(info.status.is_empty());
        assert!(info.result[0].initiator.is_empty());
        assert_eq!(info.first_host("vd1").unwrap(), "h1");
    }

    #[test]
    fn test_empty_result_is_error() {
        let info = AclInformation::from_slice(br#"{"status":"ok","result":[]}"#).unwrap();
        let err = info.first_host("vd1").unwrap_err();
        assert!(matches!(err, Error::EmptyResult { ref vdisk } if vdisk == "vd1"));
    }

    #[test]
    fn test_malformed_body_is_error() {
        assert!(matches!(
            AclInformation::from_slice(b"<html>"),
            Err(Error::Serialization(_))
        ));
    }
}
