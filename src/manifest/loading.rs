//! Loading ordering manifests from JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Manifest;

impl Manifest {
  /// Parse a manifest from its JSON text.
  pub fn from_json_str(content: &str) -> serde_json::Result<Self> {
    serde_json::from_str(content)
  }
}

/// Load an ordering manifest from disk.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
  let content = fs::read_to_string(path)
    .with_context(|| format!("manifest not found at {}", path.display()))?;
  Manifest::from_json_str(&content)
    .with_context(|| format!("failed to parse ordering manifest {}", path.display()))
}
