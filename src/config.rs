//! Resolver configuration discovered next to the ordering manifest.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, warn};
use serde::Deserialize;

use crate::asset_paths::IgnoreRules;
use crate::models::Category;
use crate::selection::AssetSelection;

/// File name searched for beside the manifest.
pub const DEFAULT_CONFIG_FILE: &str = "asset-order.config.json";

/// Discoverable configuration describing where category assets live on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
  /// Directory holding library scripts, relative to the asset root.
  pub lib_dir: String,
  /// Directory holding application scripts, relative to the asset root.
  pub js_dir: String,
  /// Directory holding stylesheets, relative to the asset root.
  pub css_dir: String,
  /// Whether files missing from the manifest are appended as unconstrained assets.
  pub discover_unlisted: bool,
  /// Path prefixes discovery is limited to.
  pub include: Vec<String>,
  /// Path prefixes discovery skips.
  pub exclude: Vec<String>,
  /// Extra regular expressions for discovered files to ignore.
  pub ignore_patterns: Vec<String>,
}

impl Default for ResolverConfig {
  fn default() -> Self {
    Self {
      lib_dir: "lib".into(),
      js_dir: "js".into(),
      css_dir: "css".into(),
      discover_unlisted: true,
      include: Vec::new(),
      exclude: Vec::new(),
      ignore_patterns: Vec::new(),
    }
  }
}

impl ResolverConfig {
  /// Attempt to load configuration from the provided directory.
  ///
  /// A missing file yields the defaults; a file that fails to parse is reported and the
  /// defaults are used instead.
  pub fn discover(manifest_dir: &Path) -> Self {
    let candidate = manifest_dir.join(DEFAULT_CONFIG_FILE);
    if !candidate.exists() {
      debug!("no {} in {}, using defaults", DEFAULT_CONFIG_FILE, manifest_dir.display());
      return Self::default();
    }

    Self::from_path(&candidate).unwrap_or_else(|| {
      warn!("ignoring unreadable config at {}", candidate.display());
      Self::default()
    })
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Option<Self> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
  }

  /// Directory name configured for `category`.
  pub fn category_dir(&self, category: Category) -> &str {
    match category {
      Category::Lib => &self.lib_dir,
      Category::Js => &self.js_dir,
      Category::Css => &self.css_dir,
    }
  }

  /// Absolute directory scanned for `category` assets under `root`.
  pub fn category_path(&self, root: &Path, category: Category) -> PathBuf {
    root.join(self.category_dir(category))
  }

  /// Selection built from the include and exclude lists.
  pub fn selection(&self) -> AssetSelection {
    AssetSelection::from_lists(self.include.iter().cloned(), self.exclude.iter().cloned())
  }

  /// Compiled ignore rules for discovered files.
  pub fn ignore_rules(&self) -> Result<IgnoreRules> {
    IgnoreRules::new(&self.ignore_patterns)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn defaults_when_file_is_missing() {
    let temp = tempdir().expect("failed to create temp dir");
    let config = ResolverConfig::discover(temp.path());

    assert_eq!(config.category_dir(Category::Lib), "lib");
    assert_eq!(config.category_dir(Category::Css), "css");
    assert!(config.discover_unlisted);
    assert!(config.selection().is_unfiltered());
  }

  #[test]
  fn reads_partial_configuration() {
    let temp = tempdir().expect("failed to create temp dir");
    fs::write(
      temp.path().join(DEFAULT_CONFIG_FILE),
      r#"{"css_dir": "styles", "exclude": ["legacy"], "ignore_patterns": ["\\.spec\\.js$"]}"#,
    )
    .expect("failed to write config");

    let config = ResolverConfig::discover(temp.path());
    assert_eq!(config.category_dir(Category::Css), "styles");
    assert_eq!(config.category_dir(Category::Js), "js");
    assert_eq!(
      config.category_path(Path::new("webapp"), Category::Css),
      Path::new("webapp").join("styles")
    );
    assert!(!config.selection().is_included("legacy/old.css"));
    assert!(config.ignore_rules().unwrap().is_ignored("app.spec.js"));
  }

  #[test]
  fn falls_back_to_defaults_on_invalid_json() {
    let temp = tempdir().expect("failed to create temp dir");
    fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "{ not json").expect("failed to write");

    let config = ResolverConfig::discover(temp.path());
    assert_eq!(config.category_dir(Category::Js), "js");
  }
}
