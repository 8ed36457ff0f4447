//! Organization, the root of a hierarchy

use serde::{Deserialize, Serialize};

use super::assembled::AssembledOrg;
use super::error::{ConflictError, Error, Result, ValidationError};
use super::folder::{Folder, FolderSpec};
use super::kind::{deserialize_id, Reference, ResourceKind};
use super::resource::{
    adopt_reference_id, merge_attributes, merge_field, Attributes, Resource, ResourceHandler,
};

/// Organization spec as declared in YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSpec {
    /// GCP organization id
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    /// Optional organization name
    #[serde(default)]
    pub display_name: String,
    #[serde(default, rename = "folders")]
    pub folder_specs: Vec<FolderSpec>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

/// A GCP organization and its validated sub-folders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Organization {
    pub api_version: String,
    pub spec: OrganizationSpec,
    sub_folders: Vec<Resource>,
}

impl Organization {
    pub fn new(api_version: &str, spec: OrganizationSpec) -> Self {
        Self {
            api_version: api_version.to_string(),
            spec,
            sub_folders: Vec::new(),
        }
    }

    /// Bare organization known only by id
    pub fn with_id(id: &str) -> Self {
        Self::new(
            "",
            OrganizationSpec {
                id: id.to_string(),
                ..Default::default()
            },
        )
    }
}

impl ResourceHandler for Organization {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Organization
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
                kind: ResourceKind::Organization,
            });
        }

        let parent = Reference::new(ResourceKind::Organization, &self.spec.id);
        for spec in std::mem::take(&mut self.spec.folder_specs) {
            let mut folder = Folder::nested(&self.api_version, spec, parent.clone());
            folder.validate()?;
            self.sub_folders.push(Resource::Folder(folder));
        }
        Ok(())
    }

    fn initialize_by_reference(
        &mut self,
        reference: &Reference,
    ) -> std::result::Result<(), ConflictError> {
        adopt_reference_id(ResourceKind::Organization, &mut self.spec.id, reference)
    }

    fn merge_fields(&mut self, older: &Self) -> Result<()> {
        merge_field(&mut self.api_version, &older.api_version);
        merge_field(&mut self.spec.display_name, &older.spec.display_name);
        merge_attributes(&mut self.spec.attributes, &older.spec.attributes);
        Ok(())
    }

    fn add_to_org(mut self, assembled: &mut AssembledOrg) -> Result<Self> {
        // The slot may already hold this org, initialized by a reference or
        // an earlier declaration.
        let own = Reference::new(ResourceKind::Organization, &self.spec.id);
        assembled.org_mut().initialize_by_reference(&own)?;
        self.merge_fields(assembled.org())?;

        assembled.register(&self)?;

        for sub_folder in std::mem::take(&mut self.sub_folders) {
            let enrolled = sub_folder.add_to_org(assembled)?;
            self.sub_folders.push(enrolled);
        }
        Ok(self)
    }

    fn resolve_references(&mut self, refs: Vec<Resource>) -> Result<()> {
        for reference in refs {
            match reference {
                Resource::Folder(folder) => {
                    tracing::debug!(
                        "attaching {} to {}",
                        folder.resource_id(),
                        self.resource_id()
                    );
                    self.sub_folders.push(Resource::Folder(folder));
                }
                other => {
                    return Err(Error::UnsupportedReference {
                        parent: self.resource_id(),
                        child: other.resource_id(),
                    });
                }
            }
        }
        Ok(())
    }

    fn children(&self) -> &[Resource] {
        &self.sub_folders
    }

    fn children_mut(&mut self) -> &mut [Resource] {
        &mut self.sub_folders
    }
}
