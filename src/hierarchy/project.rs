//! Projects, the leaves of a hierarchy

use serde::{Deserialize, Serialize};

use super::assembled::AssembledOrg;
use super::error::{ConflictError, Error, Result, ValidationError};
use super::kind::{deserialize_id, Reference, ResourceKind};
use super::resource::{
    adopt_reference_id, merge_attributes, merge_field, Attributes, Resource, ResourceHandler,
};

/// Project spec as declared in YAML.
///
/// Business fields such as `billingAccount` or `labels` land in `attributes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSpec {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ref: Option<Reference>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub api_version: String,
    pub spec: ProjectSpec,
    pub parent: Option<Reference>,
}

impl Project {
    pub fn new(api_version: &str, spec: ProjectSpec) -> Self {
        Self {
            api_version: api_version.to_string(),
            spec,
            parent: None,
        }
    }

    pub fn nested(api_version: &str, spec: ProjectSpec, parent: Reference) -> Self {
        Self {
            parent: Some(parent),
            ..Self::new(api_version, spec)
        }
    }

    pub fn with_parent(id: &str, parent: Reference) -> Self {
        Self::new(
            "",
            ProjectSpec {
                id: id.to_string(),
                parent_ref: Some(parent),
                ..Default::default()
            },
        )
    }
}

impl ResourceHandler for Project {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Project
    }

    fn id(&self) -> &str {
        &self.spec.id
    }

    fn display_name(&self) -> &str {
        &self.spec.display_name
    }

    fn validate(&mut self) -> std::result::Result<(), ValidationError> {
        if self.spec.id.is_empty() {
            return Err(ValidationError::EmptyId {
                kind: ResourceKind::Project,
            });
        }
        if self.parent.is_none() {
            self.parent = self.spec.parent_ref.clone();
        }
        if self.parent.is_none() {
            return Err(ValidationError::MissingParent {
                resource_id: self.resource_id(),
            });
        }
        Ok(())
    }

    fn initialize_by_reference(
        &mut self,
        reference: &Reference,
    ) -> std::result::Result<(), ConflictError> {
        adopt_reference_id(ResourceKind::Project, &mut self.spec.id, reference)
    }

    fn merge_fields(&mut self, older: &Self) -> Result<()> {
        merge_field(&mut self.api_version, &older.api_version);
        merge_field(&mut self.spec.display_name, &older.spec.display_name);
        merge_attributes(&mut self.spec.attributes, &older.spec.attributes);
        Ok(())
    }

    fn add_to_org(self, assembled: &mut AssembledOrg) -> Result<Self> {
        assembled.register(&self)?;
        Ok(self)
    }

    fn resolve_references(&mut self, refs: Vec<Resource>) -> Result<()> {
        match refs.first() {
            Some(child) => Err(Error::UnsupportedReference {
                parent: self.resource_id(),
                child: child.resource_id(),
            }),
            None => Ok(()),
        }
    }

    fn children(&self) -> &[Resource] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Resource] {
        &mut []
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_hosts_no_children() {
        let own = Reference::new(ResourceKind::Project, "p1");
        let mut project = Project::with_parent("p1", Reference::new(ResourceKind::Folder, "f1"));
        assert!(project.resolve_references(Vec::new()).is_ok());

        let err = project
            .resolve_references(vec![Resource::Project(Project::with_parent("p2", own))])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedReference { ref child, .. } if child == "Project.p2"
        ));
    }

    #[test]
    fn test_attributes_are_kept_opaque() {
        let spec: ProjectSpec = serde_yaml::from_str(
            "id: p1\nbillingAccount: 0000-1111\nlabels:\n  team: eng\n",
        )
        .unwrap();
        assert_eq!(spec.id, "p1");
        assert_eq!(
            spec.attributes["billingAccount"],
            serde_yaml::Value::from("0000-1111")
        );
        assert!(spec.attributes.contains_key("labels"));
    }

    #[test]
    fn test_merge_fields_fills_missing_attributes() {
        let parent = Reference::new(ResourceKind::Folder, "f1");
        let mut incoming = Project::with_parent("p1", parent.clone());
        let mut older = Project::with_parent("p1", parent);
        older
            .spec
            .attributes
            .insert("billingAccount".into(), serde_yaml::Value::from("X"));

        incoming.merge_fields(&older).unwrap();
        assert_eq!(
            incoming.spec.attributes["billingAccount"],
            serde_yaml::Value::from("X")
        );
    }

    #[test]
    fn test_initialize_by_reference_adopts_id() {
        let mut project = Project::default();
        project
            .initialize_by_reference(&Reference::new(ResourceKind::Project, "p9"))
            .unwrap();
        assert_eq!(project.id(), "p9");
    }
}
