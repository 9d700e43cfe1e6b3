//! Command plumbing shared by the `asset-order` binary.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::ValueEnum;
use log::{error, info};

use crate::config::ResolverConfig;
use crate::manifest::load_manifest;
use crate::models::{Category, Manifest};
use crate::resolver::ManifestResolution;

/// Output format of the `resolve` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
  /// `{"lib": [...], "js": [...], "css": [...]}`.
  Json,
  /// `# <category>` headers followed by one path per line.
  Text,
}

/// Where the manifest lives and how its unlisted assets are found.
#[derive(Debug, Clone)]
pub struct ManifestInput {
  /// Path to the ordering manifest JSON.
  pub manifest: PathBuf,
  /// Asset root holding the category directories; defaults to the manifest directory.
  pub root: Option<PathBuf>,
  /// Whether assets found on disk are appended; the config can still turn this off.
  pub discover: bool,
}

impl ManifestInput {
  /// Load the manifest and merge discovered assets when enabled.
  pub fn prepare(&self) -> Result<Manifest> {
    let manifest = load_manifest(&self.manifest)?;
    let manifest_dir = self
      .manifest
      .parent()
      .filter(|parent| !parent.as_os_str().is_empty())
      .unwrap_or(Path::new("."));
    let config = ResolverConfig::discover(manifest_dir);
    let root = self.root.as_deref().unwrap_or(manifest_dir);

    info!("loaded ordering manifest {}", self.manifest.display());
    if !self.discover || !config.discover_unlisted {
      return Ok(manifest);
    }

    manifest.merge_discovered(root, &config, &config.selection())
  }
}

/// Keep only `categories` in the manifest; an empty list keeps every category.
pub fn retain_categories(manifest: &mut Manifest, categories: &[Category]) {
  if categories.is_empty() {
    return;
  }
  manifest
    .categories
    .retain(|category, _| categories.contains(category));
}

/// Render every category that resolved, skipping the failed ones.
pub fn render_resolution(resolution: &ManifestResolution, format: OutputFormat) -> Result<String> {
  let resolved = resolution.resolved();
  Ok(match format {
    OutputFormat::Json => {
      let mut json = serde_json::to_string_pretty(&resolved)?;
      json.push('\n');
      json
    }
    OutputFormat::Text => resolved.render_text(),
  })
}

/// One status line per category for the `check` command.
pub fn check_report(resolution: &ManifestResolution) -> String {
  let mut report = String::new();
  for (category, outcome) in &resolution.categories {
    let _ = match outcome {
      Ok(order) => writeln!(report, "{category}: ok ({} assets)", order.len()),
      Err(err) => writeln!(report, "{err}"),
    };
  }
  report
}

/// Fail when any category did not resolve.
pub fn ensure_resolved(resolution: &ManifestResolution) -> Result<()> {
  let failed = resolution.errors().count();
  if failed > 0 {
    bail!("{failed} categories failed to resolve");
  }
  Ok(())
}

/// Log each category error, then fail when there was any.
pub fn report_failures(resolution: &ManifestResolution) -> Result<()> {
  for err in resolution.errors() {
    error!("{err}");
  }
  ensure_resolved(resolution)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::DEFAULT_CONFIG_FILE;
  use crate::resolver::resolve_manifest;
  use std::fs;
  use tempfile::tempdir;

  const ORDER: &str = r#"{
    "lib": [{"path": "jquery.js", "order": "first"}, {"path": "angular.js"}],
    "js": [{"path": "app.js", "before": "controllers.js"}],
    "css": [{"path": "theme.css", "after": "bootstrap.min.css"}]
  }"#;

  fn write_fixture(root: &Path) -> PathBuf {
    let manifest = root.join("order.json");
    fs::write(&manifest, ORDER).unwrap();
    fs::create_dir_all(root.join("js")).unwrap();
    fs::write(root.join("js/controllers.js"), "").unwrap();
    manifest
  }

  fn input(manifest: PathBuf, discover: bool) -> ManifestInput {
    ManifestInput {
      manifest,
      root: None,
      discover,
    }
  }

  #[test]
  fn renders_resolved_categories_and_fails_on_broken_ones() {
    let dir = tempdir().unwrap();
    let manifest = input(write_fixture(dir.path()), true).prepare().unwrap();
    let resolution = resolve_manifest(&manifest);

    let text = render_resolution(&resolution, OutputFormat::Text).unwrap();
    assert_eq!(text, "# lib\njquery.js\nangular.js\n# js\napp.js\ncontrollers.js\n");

    let json = render_resolution(&resolution, OutputFormat::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["lib"], serde_json::json!(["jquery.js", "angular.js"]));
    assert!(parsed.get("css").is_none());

    let err = report_failures(&resolution).unwrap_err();
    assert_eq!(err.to_string(), "1 categories failed to resolve");
  }

  #[test]
  fn discovery_can_be_disabled_by_flag_or_config() {
    let dir = tempdir().unwrap();
    let manifest_path = write_fixture(dir.path());

    let without = resolve_manifest(&input(manifest_path.clone(), false).prepare().unwrap());
    assert!(matches!(without.get(Category::Js), Some(Err(_))));

    fs::write(dir.path().join(DEFAULT_CONFIG_FILE), r#"{"discover_unlisted": false}"#).unwrap();
    let configured = resolve_manifest(&input(manifest_path, true).prepare().unwrap());
    assert!(matches!(configured.get(Category::Js), Some(Err(_))));
  }

  #[test]
  fn root_override_points_discovery_elsewhere() {
    let dir = tempdir().unwrap();
    let manifest_path = write_fixture(dir.path());
    let assets = dir.path().join("webapp");
    fs::create_dir_all(assets.join("css")).unwrap();
    fs::write(assets.join("css/bootstrap.min.css"), "").unwrap();

    let manifest = ManifestInput {
      root: Some(assets),
      ..input(manifest_path, true)
    }
    .prepare()
    .unwrap();
    let resolution = resolve_manifest(&manifest);

    assert_eq!(
      resolution.get(Category::Css),
      Some(&Ok(vec!["bootstrap.min.css".to_string(), "theme.css".to_string()]))
    );
    assert!(matches!(resolution.get(Category::Js), Some(Err(_))));
  }

  #[test]
  fn category_filter_limits_resolution() {
    let dir = tempdir().unwrap();
    let mut manifest = input(write_fixture(dir.path()), true).prepare().unwrap();

    retain_categories(&mut manifest, &[Category::Lib]);
    let resolution = resolve_manifest(&manifest);

    assert_eq!(resolution.categories.len(), 1);
    assert!(ensure_resolved(&resolution).is_ok());

    let mut untouched = Manifest::default().with_unlisted(Category::Css, ["a.css"]);
    retain_categories(&mut untouched, &[]);
    assert_eq!(untouched.categories.len(), 1);
  }

  #[test]
  fn check_report_lists_each_category_once() {
    let dir = tempdir().unwrap();
    let manifest = input(write_fixture(dir.path()), true).prepare().unwrap();
    let report = check_report(&resolve_manifest(&manifest));

    assert_eq!(
      report,
      "lib: ok (2 assets)\njs: ok (2 assets)\n\
       css: `theme.css` references missing asset `bootstrap.min.css`\n"
    );
  }
}
