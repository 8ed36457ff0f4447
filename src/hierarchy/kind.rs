//! Resource kinds and references between resources

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::fmt;
use std::str::FromStr;

use super::error::ValidationError;

/// API version written by the declarations this crate understands
pub const SUPPORTED_API_VERSION: &str = "cloudfoundation/v1alpha1";

/// The closed set of resource kinds in a hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    Organization,
    Folder,
    Project,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Organization => "Organization",
            ResourceKind::Folder => "Folder",
            ResourceKind::Project => "Project",
        }
    }

    /// Internal referencable id, `Kind.id`
    pub fn resource_id(self, id: &str) -> String {
        format!("{}.{}", self.as_str(), id)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Organization" => Ok(ResourceKind::Organization),
            "Folder" => Ok(ResourceKind::Folder),
            "Project" => Ok(ResourceKind::Project),
            other => Err(ValidationError::UnknownKind(other.to_string())),
        }
    }
}

/// Points at a resource by kind and id, e.g. a folder's `parentRef`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
}

impl Reference {
    pub fn new(kind: ResourceKind, id: &str) -> Self {
        Self {
            kind,
            id: id.to_string(),
        }
    }

    /// Resource id of the target
    pub fn target(&self) -> String {
        self.kind.resource_id(&self.id)
    }
}

/// Accepts ids written as plain YAML numbers, e.g. `id: 123456789012`
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, found {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_id_format() {
        assert_eq!(ResourceKind::Folder.resource_id("f1"), "Folder.f1");
        assert_eq!(
            Reference::new(ResourceKind::Organization, "org1").target(),
            "Organization.org1"
        );
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            "Project".parse::<ResourceKind>().unwrap(),
            ResourceKind::Project
        );
        assert!(matches!(
            "folder".parse::<ResourceKind>(),
            Err(ValidationError::UnknownKind(k)) if k == "folder"
        ));
    }

    #[test]
    fn test_numeric_ids_are_read_as_strings() {
        let r: Reference = serde_yaml::from_str("type: Organization\nid: 123456789012\n").unwrap();
        assert_eq!(r.id, "123456789012");
    }

    #[test]
    fn test_reference_deserializes_type_key() {
        let r: Reference = serde_yaml::from_str("type: Folder\nid: f9\n").unwrap();
        assert_eq!(r, Reference::new(ResourceKind::Folder, "f9"));
    }
}
