//! Folders, the branch nodes of a hierarchy

use serde::{Deserialize, Serialize};

use super::assembled::AssembledOrg;
use super::error::{ConflictError, Error, Result, ValidationError};
use super::kind::{deserialize_id, Reference, ResourceKind};
use super::project::{Project, ProjectSpec};
use super::resource::{
    adopt_reference_id, merge_attributes, merge_field, Attributes, Resource, ResourceHandler,
};

/// Folder spec as declared in YAML, either top-level or nested
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderSpec {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    /// Only meaningful on top-level declarations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ref: Option<Reference>,
    #[serde(default, rename = "folders")]
    pub folder_specs: Vec<FolderSpec>,
    #[serde(default, rename = "projects")]
    pub project_specs: Vec<ProjectSpec>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

/// A GCP folder with its validated children, in declared order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Folder {
    pub api_version: String,
    pub spec: FolderSpec,
    /// Resolved parent; the enclosing spec for nested folders, `parentRef` otherwise
    pub parent: Option<Reference>,
    children: Vec<Resource>,
}

impl Folder {
    /// Top-level declaration, attached through its `parentRef`
    pub fn new(api_version: &str, spec: FolderSpec) -> Self {
        Self {
            api_version: api_version.to_string(),
            spec,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Folder declared inside another resource's spec
    pub fn nested(api_version: &str, spec: FolderSpec, parent: Reference) -> Self {
        Self {
            parent: Some(parent),
            ..Self::new(api_version, spec)
        }
    }

    pub fn with_parent(id: &str, parent: Reference) -> Self {
        Self::new(
            "",
            FolderSpec {
                id: id.to_string(),
                parent_ref: Some(parent),
                ..Default::default()
            },
        )
    }
}

impl ResourceHandler for Folder {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Folder
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
                kind: ResourceKind::Folder,
            });
        }

        if self.parent.is_none() {
            self.parent = self.spec.parent_ref.clone();
        } else if let (Some(enclosing), Some(declared)) = (&self.parent, &self.spec.parent_ref) {
            if enclosing != declared {
                tracing::warn!(
                    "{} is nested under {}, ignoring its parentRef {}",
                    self.resource_id(),
                    enclosing.target(),
                    declared.target()
                );
            }
        }
        if self.parent.is_none() {
            return Err(ValidationError::MissingParent {
                resource_id: self.resource_id(),
            });
        }

        let own = Reference::new(ResourceKind::Folder, &self.spec.id);
        for spec in std::mem::take(&mut self.spec.folder_specs) {
            let mut folder = Folder::nested(&self.api_version, spec, own.clone());
            folder.validate()?;
            self.children.push(Resource::Folder(folder));
        }
        for spec in std::mem::take(&mut self.spec.project_specs) {
            let mut project = Project::nested(&self.api_version, spec, own.clone());
            project.validate()?;
            self.children.push(Resource::Project(project));
        }
        Ok(())
    }

    fn initialize_by_reference(
        &mut self,
        reference: &Reference,
    ) -> std::result::Result<(), ConflictError> {
        adopt_reference_id(ResourceKind::Folder, &mut self.spec.id, reference)
    }

    fn merge_fields(&mut self, older: &Self) -> Result<()> {
        merge_field(&mut self.api_version, &older.api_version);
        merge_field(&mut self.spec.display_name, &older.spec.display_name);
        merge_attributes(&mut self.spec.attributes, &older.spec.attributes);
        Ok(())
    }

    fn add_to_org(mut self, assembled: &mut AssembledOrg) -> Result<Self> {
        // A folder's slot is its position under the parent; nothing can be
        // there before enrollment, so the registry alone guards it.
        assembled.register(&self)?;

        for child in std::mem::take(&mut self.children) {
            let enrolled = child.add_to_org(assembled)?;
            self.children.push(enrolled);
        }
        Ok(self)
    }

    fn resolve_references(&mut self, refs: Vec<Resource>) -> Result<()> {
        for reference in refs {
            match reference {
                Resource::Organization(org) => {
                    return Err(Error::UnsupportedReference {
                        parent: self.resource_id(),
                        child: org.resource_id(),
                    });
                }
                child => {
                    tracing::debug!(
                        "attaching {} to {}",
                        child.resource_id(),
                        self.resource_id()
                    );
                    self.children.push(child);
                }
            }
        }
        Ok(())
    }

    fn children(&self) -> &[Resource] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Resource] {
        &mut self.children
    }
}
