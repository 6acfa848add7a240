//! Provider and resource schemas advertised to the plugin host

use serde::Serialize;

/// One attribute of a schema block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
}

impl Attribute {
    fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            required: true,
            optional: false,
            computed: false,
            sensitive: false,
        }
    }

    fn optional(name: &'static str, description: &'static str) -> Self {
        Self {
            required: false,
            optional: true,
            ..Self::required(name, description)
        }
    }

    fn computed(name: &'static str, description: &'static str) -> Self {
        Self {
            required: false,
            computed: true,
            ..Self::required(name, description)
        }
    }

    fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

/// Schema of a provider or resource block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub version: i64,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Required attributes absent or empty in `value`
    pub fn missing_required(&self, value: &crate::state::DynamicValue) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|a| a.required)
            .filter(|a| crate::state::get_optional_string_attr(value, a.name).is_none())
            .map(|a| a.name)
            .collect()
    }
}

/// Provider configuration block
pub fn provider_schema() -> Schema {
    Schema {
        version: 0,
        attributes: vec![
            Attribute::optional("node", "Cluster node serving the management API"),
            Attribute::optional("session_id", "Management API session id").sensitive(),
            Attribute::optional("request_format", "Request encoding: legacy or json"),
        ],
    }
}

/// `hedvig_access` resource
pub fn access_schema() -> Schema {
    Schema {
        version: 0,
        attributes: vec![
            Attribute::computed("id", "access-<vdisk>-<host>-<address>"),
            Attribute::required("vdisk", "Virtual disk to grant access to"),
            Attribute::required("host", "Host the disk is exported to"),
            Attribute::required("address", "Initiator network address"),
            Attribute::required("type", "Access type as understood by the cluster"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{make_state, string_value};

    #[test]
    fn test_access_schema_fields() {
        let schema = access_schema();
        for name in ["vdisk", "host", "address", "type"] {
            assert!(schema.attribute(name).unwrap().required, "{name}");
        }
        assert!(schema.attribute("id").unwrap().computed);
    }

    #[test]
    fn test_session_id_is_sensitive() {
        assert!(provider_schema().attribute("session_id").unwrap().sensitive);
    }

    #[test]
    fn test_missing_required() {
        let value = make_state(vec![
            ("vdisk", string_value("vd1")),
            ("host", string_value("")),
        ]);
        assert_eq!(access_schema().missing_required(&value), vec!["host", "address", "type"]);
    }
}
