//! Reference resolver
//!
//! Declarations are matched to their parents by id in two passes, so a child
//! may be declared before or after its parent, in any input document:
//!
//! 1. validate every declaration and index top-level children by the
//!    resource id of their parent;
//! 2. walk down from the organization, pulling each node's references out of
//!    the index and attaching them.
//!
//! Whatever is still indexed afterwards never reached the organization.

use std::collections::{BTreeMap, HashSet};

use super::assembled::AssembledOrg;
use super::error::{ConflictError, Error, Result, ValidationError};
use super::kind::{Reference, ResourceKind};
use super::organization::Organization;
use super::resource::{Resource, ResourceHandler};

/// Top-level declarations waiting for their parent, keyed by the parent's
/// resource id. Each list keeps declaration order.
#[derive(Debug, Default)]
struct ReferenceIndex {
    pending: BTreeMap<String, Vec<Resource>>,
}

impl ReferenceIndex {
    fn insert(&mut self, target: String, resource: Resource) {
        self.pending.entry(target).or_default().push(resource);
    }

    fn take(&mut self, target: &str) -> Vec<Resource> {
        self.pending.remove(target).unwrap_or_default()
    }

    /// Reports the first leftover reference, if any.
    ///
    /// A target that is not itself stranded was never declared. When every
    /// target is stranded, the leftovers only point at each other.
    fn finish(self) -> Result<()> {
        let stranded: HashSet<String> = self
            .pending
            .values()
            .flatten()
            .flat_map(Resource::subtree_ids)
            .collect();

        if let Some((target, children)) = self
            .pending
            .iter()
            .find(|(target, _)| !stranded.contains(*target))
        {
            return Err(Error::DanglingReference {
                parent: target.clone(),
                child: children
                    .first()
                    .map(|c| c.resource_id())
                    .unwrap_or_default(),
            });
        }

        match self.pending.into_keys().next() {
            None => Ok(()),
            Some(target) => Err(Error::Cycle { resource_id: target }),
        }
    }
}

/// Validates declarations and links them into organization trees.
///
/// The organization slot of `assembled` is initialized from every reference
/// to an organization and from every organization declaration, in
/// declaration order. The returned organizations are ready to be enrolled;
/// when no organization is declared, the one materialized by references is
/// returned.
pub fn resolve(
    declarations: Vec<Resource>,
    assembled: &mut AssembledOrg,
) -> Result<Vec<Organization>> {
    let mut orgs = Vec::new();
    let mut index = ReferenceIndex::default();

    for mut declaration in declarations {
        declaration.validate()?;

        match declaration {
            Resource::Organization(org) => {
                assembled
                    .org_mut()
                    .initialize_by_reference(&org_reference(&org))?;
                orgs.push(org);
            }
            child => {
                let Some(parent) = child.parent().cloned() else {
                    return Err(ValidationError::MissingParent {
                        resource_id: child.resource_id(),
                    }
                    .into());
                };
                match parent.kind {
                    ResourceKind::Organization => {
                        assembled.org_mut().initialize_by_reference(&parent)?;
                    }
                    kind if parent.id.is_empty() => {
                        return Err(ConflictError::UnsetId { kind }.into());
                    }
                    _ => {}
                }
                tracing::debug!("{} waits for {}", child.resource_id(), parent.target());
                index.insert(parent.target(), child);
            }
        }
    }

    if orgs.is_empty() {
        let org = assembled.org().clone();
        if org.spec.id.is_empty() {
            return Err(ValidationError::EmptyId {
                kind: ResourceKind::Organization,
            }
            .into());
        }
        tracing::debug!("{} is only known by reference", org.resource_id());
        orgs.push(org);
    }

    for org in &mut orgs {
        attach(org, &mut index)?;
    }
    index.finish()?;

    Ok(orgs)
}

fn org_reference(org: &Organization) -> Reference {
    Reference::new(ResourceKind::Organization, org.id())
}

/// Attaches pending references to `node`, then to each of its children.
fn attach<H: ResourceHandler>(node: &mut H, index: &mut ReferenceIndex) -> Result<()> {
    let refs = index.take(&node.resource_id());
    if !refs.is_empty() {
        node.resolve_references(refs)?;
    }
    for child in node.children_mut() {
        attach(child, index)?;
    }
    Ok(())
}
