//! Error types for hierarchy assembly

use super::kind::ResourceKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for hierarchy operations
pub type Result<T> = std::result::Result<T, Error>;

/// A declaration is malformed on its own, before any cross-node resolution.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A node has no id after all resolution attempts
    #[error("{kind} is missing its id")]
    EmptyId { kind: ResourceKind },

    /// A top-level folder or project does not say where it belongs
    #[error("{resource_id} is declared at top level without a parentRef")]
    MissingParent { resource_id: String },

    /// The document's `kind` is not one of the supported resource kinds
    #[error("unknown resource kind '{0}'")]
    UnknownKind(String),

    /// The document has no `kind` field at all
    #[error("document has no 'kind' field")]
    MissingKind,
}

/// Two sources disagree on which id a node has.
#[derive(Error, Debug)]
pub enum ConflictError {
    #[error("{kind} already initialized to '{current}', cannot reinitialize to '{requested}'")]
    IdConflict {
        kind: ResourceKind,
        current: String,
        requested: String,
    },

    #[error("trying to initialize {kind} with an empty id")]
    UnsetId { kind: ResourceKind },
}

/// Failure while reading declarations from YAML
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {origin}")]
    Yaml {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Any failure of a build run. The first error aborts the build.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The same logical node was enrolled twice independently
    #[error("{resource_id} is declared more than once")]
    DuplicateRegistration { resource_id: String },

    /// A reference names a parent that is never declared
    #[error("{child} references {parent}, which is never declared")]
    DanglingReference { parent: String, child: String },

    /// References chain back onto themselves and never reach the organization
    #[error("{resource_id} is its own ancestor")]
    Cycle { resource_id: String },

    /// A node was asked to host a child kind it cannot contain
    #[error("{parent} cannot contain {child}")]
    UnsupportedReference { parent: String, child: String },

    /// Writing rendered output failed
    #[error("failed to write output")]
    Io(#[from] std::io::Error),
}
