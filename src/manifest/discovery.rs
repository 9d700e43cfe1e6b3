//! Directory scanning utilities for finding assets the manifest does not list.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::asset_paths::IgnoreRules;
use crate::config::ResolverConfig;
use crate::models::{Category, Manifest};
use crate::selection::AssetInclusion;

/// Collect every `category` asset below its configured directory in `root`.
///
/// Paths are relative to the category directory, use forward slashes and are sorted
/// lexicographically. A missing directory yields no assets.
pub fn discover_category_assets<S: AssetInclusion>(
  root: &Path,
  category: Category,
  config: &ResolverConfig,
  selection: &S,
) -> Result<Vec<String>> {
  let ignore = config.ignore_rules()?;
  discover_with_rules(root, category, config, selection, &ignore)
}

fn discover_with_rules<S: AssetInclusion>(
  root: &Path,
  category: Category,
  config: &ResolverConfig,
  selection: &S,
  ignore: &IgnoreRules,
) -> Result<Vec<String>> {
  let dir = config.category_path(root, category);
  if !dir.is_dir() {
    debug!("{category}: no asset directory at {}", dir.display());
    return Ok(Vec::new());
  }

  let mut found = BTreeSet::new();
  collect_assets_recursively(
    &dir,
    Path::new(""),
    category.extension(),
    ignore,
    selection,
    &mut found,
  )?;
  debug!("{category}: discovered {} assets in {}", found.len(), dir.display());

  Ok(found.into_iter().collect())
}

/// Walk `dir` collecting files with `extension` as paths relative to the scan root.
pub fn collect_assets_recursively<S: AssetInclusion>(
  dir: &Path,
  relative_root: &Path,
  extension: &str,
  ignore: &IgnoreRules,
  selection: &S,
  found: &mut BTreeSet<String>,
) -> Result<()> {
  let entries =
    fs::read_dir(dir).with_context(|| format!("failed to read asset directory {}", dir.display()))?;

  for entry in entries {
    let entry = match entry {
      Ok(entry) => entry,
      Err(err) => {
        warn!("skipping unreadable entry in {}: {}", dir.display(), err);
        continue;
      }
    };

    let file_name = entry.file_name();
    let name_str = file_name.to_string_lossy();
    if name_str.starts_with('.') {
      continue;
    }

    let next_relative = if relative_root.as_os_str().is_empty() {
      PathBuf::from(&file_name)
    } else {
      relative_root.join(&file_name)
    };

    let file_type = match entry.file_type() {
      Ok(file_type) => file_type,
      Err(err) => {
        warn!("skipping {}: {}", entry.path().display(), err);
        continue;
      }
    };

    if file_type.is_dir() {
      collect_assets_recursively(
        &entry.path(),
        &next_relative,
        extension,
        ignore,
        selection,
        found,
      )?;
      continue;
    }

    let has_extension = Path::new(&file_name)
      .extension()
      .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
    if !file_type.is_file() || !has_extension {
      continue;
    }

    let rel_path_str = next_relative.to_string_lossy().replace('\\', "/");
    if ignore.is_ignored(&rel_path_str) || !selection.is_included(&rel_path_str) {
      continue;
    }

    found.insert(rel_path_str);
  }

  Ok(())
}

impl Manifest {
  /// Append every discovered asset the manifest does not list yet, for all categories.
  ///
  /// Discovered assets carry no directive and follow the authored entries, so they only
  /// move when another descriptor references them.
  pub fn merge_discovered<S: AssetInclusion>(
    self,
    root: &Path,
    config: &ResolverConfig,
    selection: &S,
  ) -> Result<Self> {
    let ignore = config.ignore_rules()?;
    let mut manifest = self;
    for category in Category::ALL {
      let discovered = discover_with_rules(root, category, config, selection, &ignore)?;
      manifest = manifest.with_unlisted(category, discovered);
    }
    Ok(manifest)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::DescriptorRecord;
  use crate::selection::AssetSelection;
  use tempfile::tempdir;

  fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
  }

  #[test]
  fn collects_category_files_recursively() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(root, "lib/jquery/jquery.js");
    touch(root, "lib/jquery/jquery.min.js.map");
    touch(root, "lib/angular/angular.min.js");
    touch(root, "lib/.hidden/skip.js");
    touch(root, "lib/readme.txt");
    touch(root, "css/index.css");

    let assets = discover_category_assets(
      root,
      Category::Lib,
      &ResolverConfig::default(),
      &AssetSelection::default(),
    )
    .unwrap();

    assert_eq!(assets, vec!["angular/angular.min.js", "jquery/jquery.js"]);
  }

  #[test]
  fn missing_category_directory_is_empty() {
    let dir = tempdir().unwrap();
    let assets = discover_category_assets(
      dir.path(),
      Category::Css,
      &ResolverConfig::default(),
      &AssetSelection::default(),
    )
    .unwrap();

    assert!(assets.is_empty());
  }

  #[test]
  fn honours_selection_and_configured_ignores() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(root, "scripts/app.js");
    touch(root, "scripts/app.spec.js");
    touch(root, "scripts/legacy/old.js");

    let config = ResolverConfig {
      js_dir: "scripts".into(),
      exclude: vec!["legacy".into()],
      ignore_patterns: vec![r"\.spec\.js$".into()],
      ..ResolverConfig::default()
    };

    let assets =
      discover_category_assets(root, Category::Js, &config, &config.selection()).unwrap();
    assert_eq!(assets, vec!["app.js"]);
  }

  #[test]
  fn merges_unlisted_assets_after_authored_entries() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(root, "js/controllers.js");
    touch(root, "js/app.js");
    touch(root, "css/bootstrap.min.css");

    let mut manifest = Manifest::default();
    manifest.categories.insert(Category::Js, vec![DescriptorRecord {
      before: Some("controllers.js".into()),
      ..DescriptorRecord::unconstrained("app.js")
    }]);

    let manifest = manifest
      .merge_discovered(root, &ResolverConfig::default(), &AssetSelection::default())
      .unwrap();

    let js: Vec<&str> = manifest
      .descriptors(Category::Js)
      .iter()
      .map(|entry| entry.path.as_str())
      .collect();
    assert_eq!(js, vec!["app.js", "controllers.js"]);
    assert_eq!(manifest.descriptors(Category::Css), [DescriptorRecord::unconstrained(
      "bootstrap.min.css"
    )]);
    assert!(manifest.descriptors(Category::Lib).is_empty());
  }
}
