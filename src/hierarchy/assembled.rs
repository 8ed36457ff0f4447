//! Assembled organization
//!
//! [`AssembledOrg`] is the single accumulator of a build run: it owns the
//! canonical organization and the registry of every enrolled resource id.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;

use super::diagram::Diagram;
use super::error::{Error, Result};
use super::kind::ResourceKind;
use super::organization::Organization;
use super::resource::ResourceHandler;

/// Indentation step used by `dump` unless configured otherwise
pub const DEFAULT_INDENT_SIZE: usize = 2;

#[derive(Debug, Default)]
pub struct AssembledOrg {
    org: Organization,
    registry: HashMap<String, ResourceKind>,
}

impl AssembledOrg {
    pub fn new() -> Self {
        Self::default()
    }

    /// The organization slot
    pub fn org(&self) -> &Organization {
        &self.org
    }

    pub(crate) fn org_mut(&mut self) -> &mut Organization {
        &mut self.org
    }

    /// Enrolls an organization and puts the finalized tree in the slot.
    pub fn enroll(&mut self, org: Organization) -> Result<()> {
        let org = org.add_to_org(self)?;
        self.org = org;
        Ok(())
    }

    /// Marks a resource as enrolled; a second registration is an error.
    pub fn register<H: ResourceHandler>(&mut self, resource: &H) -> Result<()> {
        let resource_id = resource.resource_id();
        if self.registry.contains_key(&resource_id) {
            tracing::error!("{} is already registered", resource_id);
            return Err(Error::DuplicateRegistration { resource_id });
        }
        tracing::debug!("registered {}", resource_id);
        self.registry.insert(resource_id, resource.kind());
        Ok(())
    }

    pub fn is_registered(&self, resource_id: &str) -> bool {
        self.registry.contains_key(resource_id)
    }

    /// Number of enrolled resources
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Enrolled resources per kind
    pub fn counts(&self) -> BTreeMap<ResourceKind, usize> {
        let mut counts = BTreeMap::new();
        for kind in self.registry.values() {
            *counts.entry(*kind).or_insert(0) += 1;
        }
        counts
    }

    /// Writes the tree as indented text, one line per resource.
    pub fn dump(&self, indent_size: usize, sink: &mut dyn Write) -> Result<()> {
        self.org.dump(0, indent_size, sink).map_err(Error::Io)
    }

    /// Builds a node/edge diagram of the tree.
    pub fn draw(&self) -> Diagram {
        let mut diagram = Diagram::new();
        self.org.draw(&mut diagram);
        diagram
    }
}
