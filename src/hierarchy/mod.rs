//! Resource hierarchy assembly
//!
//! This module turns a flat list of declared resources (organization, folders,
//! projects) into a single validated tree, whatever order they were declared
//! in and however they are split across documents.
//!
//! # Architecture
//!
//! - [`document`] - Parses YAML documents into [`Resource`] declarations
//! - [`resource`] - The [`ResourceHandler`] capabilities shared by every node
//! - [`organization`], [`folder`], [`project`] - The three node kinds
//! - [`resolver`] - Links children to parents declared anywhere, by id
//! - [`assembled`] - [`AssembledOrg`], the canonical tree and its registry
//! - [`diagram`] - Node/edge view of an assembled tree
//!
//! # Example
//!
//! ```ignore
//! use launchpad::hierarchy::{build, document};
//!
//! fn print(yaml: &str) -> launchpad::hierarchy::Result<()> {
//!     let assembled = build(document::parse_documents(yaml, "inline")?)?;
//!     assembled.dump(2, &mut std::io::stdout())
//! }
//! ```

pub mod assembled;
pub mod diagram;
pub mod document;
pub mod error;
pub mod folder;
pub mod kind;
pub mod organization;
pub mod project;
pub mod resolver;
pub mod resource;

pub use assembled::{AssembledOrg, DEFAULT_INDENT_SIZE};
pub use diagram::{Diagram, DiagramNode};
pub use error::{ConflictError, DocumentError, Error, Result, ValidationError};
pub use folder::{Folder, FolderSpec};
pub use kind::{Reference, ResourceKind, SUPPORTED_API_VERSION};
pub use organization::{Organization, OrganizationSpec};
pub use project::{Project, ProjectSpec};
pub use resource::{Resource, ResourceHandler};

/// Validates, resolves and assembles declarations into one tree.
///
/// Any error aborts the build; no partially assembled tree is returned.
pub fn build(declarations: Vec<Resource>) -> Result<AssembledOrg> {
    let mut assembled = AssembledOrg::new();
    for org in resolver::resolve(declarations, &mut assembled)? {
        assembled.enroll(org)?;
    }

    tracing::info!(
        "assembled {} with {} resources: {:?}",
        assembled.org().resource_id(),
        assembled.len(),
        assembled.counts()
    );
    Ok(assembled)
}
