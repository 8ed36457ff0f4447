//! Assemble and validate GCP resource hierarchies declared in YAML.

pub mod config;
pub mod hierarchy;

/// Version injected at compile time via LAUNCHPAD_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("LAUNCHPAD_VERSION") {
    Some(v) => v,
    None => "dev",
};
