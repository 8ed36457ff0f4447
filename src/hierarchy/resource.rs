//! Shared capabilities of every resource node
//!
//! [`ResourceHandler`] is implemented by the three node structs and by the
//! [`Resource`] enum, which dispatches over the closed set of kinds.

use std::collections::BTreeMap;
use std::io::Write;

use petgraph::graph::NodeIndex;
use serde_yaml::Value;

use super::assembled::AssembledOrg;
use super::diagram::{Diagram, DiagramNode};
use super::error::{ConflictError, Result, ValidationError};
use super::folder::Folder;
use super::kind::{Reference, ResourceKind};
use super::organization::Organization;
use super::project::Project;

/// Opaque business fields carried by a spec (billing account, labels, ...)
pub type Attributes = BTreeMap<String, Value>;

pub trait ResourceHandler: Sized {
    fn kind(&self) -> ResourceKind;

    fn id(&self) -> &str;

    fn display_name(&self) -> &str;

    /// Internal referencable id, `Kind.id`
    fn resource_id(&self) -> String {
        self.kind().resource_id(self.id())
    }

    /// Ensures declared fields are correct.
    ///
    /// validate also builds the typed children from nested child specs.
    fn validate(&mut self) -> std::result::Result<(), ValidationError>;

    /// Initializes the id through another resource's reference.
    fn initialize_by_reference(
        &mut self,
        reference: &Reference,
    ) -> std::result::Result<(), ConflictError>;

    /// Fills empty descriptive fields from an older instance of the same node.
    ///
    /// Not recursive: children are re-derived by enrollment.
    fn merge_fields(&mut self, older: &Self) -> Result<()>;

    /// Enrolls the node and its whole subtree into the assembled org.
    ///
    /// Returns the finalized node, which the caller puts back in its slot.
    fn add_to_org(self, assembled: &mut AssembledOrg) -> Result<Self>;

    /// Attaches resources that name this node as their parent.
    fn resolve_references(&mut self, refs: Vec<Resource>) -> Result<()>;

    fn children(&self) -> &[Resource];

    fn children_mut(&mut self) -> &mut [Resource];

    /// Writes `<indent><Kind>.<id> ("<displayName>")` then the children,
    /// each level indented `step` spaces deeper.
    fn dump(&self, indent: usize, step: usize, sink: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            sink,
            "{}{} (\"{}\")",
            " ".repeat(indent),
            self.resource_id(),
            self.display_name()
        )?;
        for child in self.children() {
            child.dump(indent + step, step, sink)?;
        }
        Ok(())
    }

    /// Adds the node, its children and the parent→child edges to a diagram.
    fn draw(&self, diagram: &mut Diagram) -> NodeIndex {
        let node = diagram.add_node(DiagramNode::new(
            self.kind(),
            self.resource_id(),
            self.display_name(),
        ));
        for child in self.children() {
            let child_node = child.draw(diagram);
            diagram.add_edge(node, child_node);
        }
        node
    }
}

/// Shared rule for adopting an id supplied by a reference.
pub(crate) fn adopt_reference_id(
    kind: ResourceKind,
    id: &mut String,
    reference: &Reference,
) -> std::result::Result<(), ConflictError> {
    if !id.is_empty() && *id != reference.id {
        tracing::error!(
            "{} already initialized to {}, cannot reinitialize to {}",
            kind,
            id,
            reference.id
        );
        return Err(ConflictError::IdConflict {
            kind,
            current: id.clone(),
            requested: reference.id.clone(),
        });
    }
    if id.is_empty() && reference.id.is_empty() {
        tracing::error!("trying to initialize {} with empty id", kind);
        return Err(ConflictError::UnsetId { kind });
    }
    *id = reference.id.clone();
    Ok(())
}

/// Copy-if-empty for a single descriptive field
pub(crate) fn merge_field(target: &mut String, older: &str) {
    if target.is_empty() && !older.is_empty() {
        *target = older.to_string();
    }
}

/// Copies attributes the receiver does not carry yet
pub(crate) fn merge_attributes(target: &mut Attributes, older: &Attributes) {
    for (key, value) in older {
        target
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
}

/// A resource declaration of any kind
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Organization(Organization),
    Folder(Folder),
    Project(Project),
}

impl Resource {
    /// Where the declaration attaches: the enclosing spec, else its `parentRef`
    pub fn parent(&self) -> Option<&Reference> {
        match self {
            Resource::Organization(_) => None,
            Resource::Folder(f) => f.parent.as_ref().or(f.spec.parent_ref.as_ref()),
            Resource::Project(p) => p.parent.as_ref().or(p.spec.parent_ref.as_ref()),
        }
    }

    /// Resource ids of this node and all its descendants, depth first
    pub fn subtree_ids(&self) -> Vec<String> {
        let mut ids = vec![self.resource_id()];
        for child in self.children() {
            ids.extend(child.subtree_ids());
        }
        ids
    }
}

impl ResourceHandler for Resource {
    fn kind(&self) -> ResourceKind {
        match self {
            Resource::Organization(o) => o.kind(),
            Resource::Folder(f) => f.kind(),
            Resource::Project(p) => p.kind(),
        }
    }

    fn id(&self) -> &str {
        match self {
            Resource::Organization(o) => o.id(),
            Resource::Folder(f) => f.id(),
            Resource::Project(p) => p.id(),
        }
    }

    fn display_name(&self) -> &str {
        match self {
            Resource::Organization(o) => o.display_name(),
            Resource::Folder(f) => f.display_name(),
            Resource::Project(p) => p.display_name(),
        }
    }

    fn validate(&mut self) -> std::result::Result<(), ValidationError> {
        match self {
            Resource::Organization(o) => o.validate(),
            Resource::Folder(f) => f.validate(),
            Resource::Project(p) => p.validate(),
        }
    }

    fn initialize_by_reference(
        &mut self,
        reference: &Reference,
    ) -> std::result::Result<(), ConflictError> {
        match self {
            Resource::Organization(o) => o.initialize_by_reference(reference),
            Resource::Folder(f) => f.initialize_by_reference(reference),
            Resource::Project(p) => p.initialize_by_reference(reference),
        }
    }

    fn merge_fields(&mut self, older: &Self) -> Result<()> {
        match (self, older) {
            (Resource::Organization(o), Resource::Organization(old)) => o.merge_fields(old),
            (Resource::Folder(f), Resource::Folder(old)) => f.merge_fields(old),
            (Resource::Project(p), Resource::Project(old)) => p.merge_fields(old),
            // different kinds are different logical nodes
            _ => Ok(()),
        }
    }

    fn add_to_org(self, assembled: &mut AssembledOrg) -> Result<Self> {
        Ok(match self {
            Resource::Organization(o) => Resource::Organization(o.add_to_org(assembled)?),
            Resource::Folder(f) => Resource::Folder(f.add_to_org(assembled)?),
            Resource::Project(p) => Resource::Project(p.add_to_org(assembled)?),
        })
    }

    fn resolve_references(&mut self, refs: Vec<Resource>) -> Result<()> {
        match self {
            Resource::Organization(o) => o.resolve_references(refs),
            Resource::Folder(f) => f.resolve_references(refs),
            Resource::Project(p) => p.resolve_references(refs),
        }
    }

    fn children(&self) -> &[Resource] {
        match self {
            Resource::Organization(o) => o.children(),
            Resource::Folder(f) => f.children(),
            Resource::Project(p) => p.children(),
        }
    }

    fn children_mut(&mut self) -> &mut [Resource] {
        match self {
            Resource::Organization(o) => o.children_mut(),
            Resource::Folder(f) => f.children_mut(),
            Resource::Project(p) => p.children_mut(),
        }
    }
}
