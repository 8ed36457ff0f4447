//! YAML document loader
//!
//! Each YAML document declares one resource:
//!
//! ```yaml
//! apiVersion: cloudfoundation/v1alpha1
//! kind: Folder
//! spec:
//!   id: f1
//!   displayName: Eng
//!   parentRef:
//!     type: Organization
//!     id: org1
//! ```
//!
//! Files may hold several `---` separated documents; directories are scanned
//! (non-recursively) for `*.yaml` and `*.yml` files in file name order.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_yaml::Value;

use super::error::{DocumentError, Error, Result, ValidationError};
use super::folder::Folder;
use super::kind::{ResourceKind, SUPPORTED_API_VERSION};
use super::organization::Organization;
use super::project::Project;
use super::resource::Resource;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Header {
    #[serde(default)]
    api_version: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    spec: Value,
}

/// Parses every YAML document in `content`, in order.
///
/// `origin` names the source in error messages (usually the file path).
pub fn parse_documents(content: &str, origin: &str) -> Result<Vec<Resource>> {
    let mut resources = Vec::new();

    for document in serde_yaml::Deserializer::from_str(content) {
        let value = Value::deserialize(document).map_err(|source| yaml_error(origin, source))?;
        if value.is_null() {
            continue;
        }

        let header: Header =
            serde_yaml::from_value(value).map_err(|source| yaml_error(origin, source))?;
        let kind: ResourceKind = header
            .kind
            .as_deref()
            .ok_or(ValidationError::MissingKind)?
            .parse()?;

        if !header.api_version.is_empty() && header.api_version != SUPPORTED_API_VERSION {
            tracing::warn!(
                "{}: unexpected apiVersion '{}' for {}, expected '{}'",
                origin,
                header.api_version,
                kind,
                SUPPORTED_API_VERSION
            );
        }

        let resource = match kind {
            ResourceKind::Organization => Resource::Organization(Organization::new(
                &header.api_version,
                spec_from(header.spec, origin)?,
            )),
            ResourceKind::Folder => Resource::Folder(Folder::new(
                &header.api_version,
                spec_from(header.spec, origin)?,
            )),
            ResourceKind::Project => Resource::Project(Project::new(
                &header.api_version,
                spec_from(header.spec, origin)?,
            )),
        };
        resources.push(resource);
    }

    tracing::debug!("{}: {} declarations", origin, resources.len());
    Ok(resources)
}

/// Reads declarations from files and directories, in the given order.
pub fn load_paths(paths: &[PathBuf]) -> Result<Vec<Resource>> {
    let mut resources = Vec::new();
    for path in paths {
        for file in expand_path(path)? {
            let content = std::fs::read_to_string(&file).map_err(|source| DocumentError::Read {
                path: file.clone(),
                source,
            })?;
            resources.extend(parse_documents(&content, &file.display().to_string())?);
        }
    }
    Ok(resources)
}

fn expand_path(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let read_error = |source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(path).map_err(read_error)? {
        let file = entry.map_err(read_error)?.path();
        let is_yaml = file
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext == "yaml" || ext == "yml")
            .unwrap_or(false);
        if is_yaml && file.is_file() {
            files.push(file);
        }
    }
    files.sort();
    Ok(files)
}

fn spec_from<T: DeserializeOwned + Default>(spec: Value, origin: &str) -> Result<T> {
    if spec.is_null() {
        return Ok(T::default());
    }
    serde_yaml::from_value(spec).map_err(|source| yaml_error(origin, source))
}

fn yaml_error(origin: &str, source: serde_yaml::Error) -> Error {
    DocumentError::Yaml {
        origin: origin.to_string(),
        source,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::kind::Reference;
    use crate::hierarchy::resource::ResourceHandler;

    const TWO_DOCS: &str = r#"
apiVersion: cloudfoundation/v1alpha1
kind: Organization
spec:
  id: "123456789"
  displayName: acme.example
---
apiVersion: cloudfoundation/v1alpha1
kind: Folder
spec:
  id: f1
  displayName: Eng
  parentRef:
    type: Organization
    id: "123456789"
"#;

    #[test]
    fn test_parse_multiple_documents() {
        let resources = parse_documents(TWO_DOCS, "test.yaml").unwrap();
        assert_eq!(resources.len(), 2);

        let Resource::Organization(org) = &resources[0] else {
            panic!("expected organization, got {:?}", resources[0]);
        };
        assert_eq!(org.spec.id, "123456789");
        assert_eq!(org.spec.display_name, "acme.example");
        assert_eq!(org.api_version, SUPPORTED_API_VERSION);

        let Resource::Folder(folder) = &resources[1] else {
            panic!("expected folder, got {:?}", resources[1]);
        };
        assert_eq!(
            folder.spec.parent_ref,
            Some(Reference::new(ResourceKind::Organization, "123456789"))
        );
    }

    #[test]
    fn test_empty_documents_are_skipped() {
        let resources = parse_documents("---\n---\n", "empty.yaml").unwrap();
        assert!(resources.is_empty());
    }

    #[test]
    fn test_missing_kind_is_rejected() {
        let err = parse_documents("spec:\n  id: x\n", "x.yaml").unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::MissingKind)));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = parse_documents("kind: Bucket\nspec:\n  id: x\n", "x.yaml").unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnknownKind(ref k)) if k == "Bucket"
        ));
    }

    #[test]
    fn test_invalid_yaml_names_origin() {
        let err = parse_documents("kind: [unclosed", "broken.yaml").unwrap_err();
        assert!(matches!(
            err,
            Error::Document(DocumentError::Yaml { ref origin, .. }) if origin == "broken.yaml"
        ));
    }

    #[test]
    fn test_nested_specs_and_missing_spec() {
        let yaml = r#"
kind: Organization
spec:
  id: org1
  folders:
    - id: f1
      projects:
        - id: p1
          billingAccount: "0000"
---
kind: Project
"#;
        let resources = parse_documents(yaml, "nested.yaml").unwrap();
        let Resource::Organization(org) = &resources[0] else {
            panic!("expected organization");
        };
        assert_eq!(org.spec.folder_specs[0].project_specs[0].id, "p1");
        assert_eq!(resources[1].id(), "");
    }

    #[test]
    fn test_load_paths_reads_directory_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("b.yaml"),
            "kind: Folder\nspec:\n  id: f1\n  parentRef:\n    type: Organization\n    id: o\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("a.yml"), "kind: Organization\nspec:\n  id: o\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not yaml").unwrap();

        let resources = load_paths(&[dir.path().to_path_buf()]).unwrap();
        let ids: Vec<String> = resources.iter().map(|r| r.resource_id()).collect();
        assert_eq!(ids, vec!["Organization.o", "Folder.f1"]);
    }

    #[test]
    fn test_load_paths_missing_file() {
        let err = load_paths(&[PathBuf::from("/nonexistent/launchpad.yaml")]).unwrap_err();
        assert!(matches!(err, Error::Document(DocumentError::Read { .. })));
    }
}
