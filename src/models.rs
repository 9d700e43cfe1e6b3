//! Data structures describing ordering manifests and their resolved output.

use std::collections::BTreeMap;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::asset_paths::normalise_asset_path;
use crate::error::{MalformedReason, ResolveError};

/// Asset family with its own independent ordering problem.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum Category {
  /// Third-party library scripts.
  Lib,
  /// Application scripts.
  Js,
  /// Stylesheets.
  Css,
}

impl Category {
  /// Every category in resolution order.
  pub const ALL: [Category; 3] = [Category::Lib, Category::Js, Category::Css];

  /// Manifest key for the category.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Lib => "lib",
      Self::Js => "js",
      Self::Css => "css",
    }
  }

  /// File extension collected for the category during discovery.
  pub fn extension(self) -> &'static str {
    match self {
      Self::Lib | Self::Js => "js",
      Self::Css => "css",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Raw descriptor exactly as authored in the manifest JSON.
///
/// Unknown keys and a missing `path` are kept for validation instead of failing the whole
/// manifest, so a bad entry only aborts its own category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DescriptorRecord {
  /// Path of the asset relative to its category directory; empty when absent.
  #[serde(default)]
  pub path: String,
  /// Raw `order` value, expected to be `first` or `last`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub order: Option<String>,
  /// Path this asset must load after.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub after: Option<String>,
  /// Path this asset must load before.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub before: Option<String>,
  /// Keys that are not part of the descriptor shape.
  #[serde(flatten)]
  pub unknown: BTreeMap<String, serde_json::Value>,
}

impl DescriptorRecord {
  /// Descriptor without any ordering directive.
  pub fn unconstrained(path: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      ..Self::default()
    }
  }
}

/// Ordering directive attached to a single descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderDirective {
  /// Sort before every descriptor not marked `first`.
  First,
  /// Sort after every descriptor not marked `last`.
  Last,
  /// Sort strictly after the named path.
  After(String),
  /// Sort strictly before the named path.
  Before(String),
}

/// Validated descriptor with a normalised path and at most one directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
  /// Normalised asset path.
  pub path: String,
  /// Optional ordering directive.
  pub directive: Option<OrderDirective>,
}

impl AssetDescriptor {
  /// Validate a raw record belonging to `category`.
  pub fn from_record(category: Category, record: &DescriptorRecord) -> Result<Self, ResolveError> {
    let path = normalise_asset_path(&record.path);
    let malformed = |reason: MalformedReason| ResolveError::MalformedDescriptor {
      category,
      path: path.clone(),
      reason,
    };

    if path.is_empty() {
      return Err(malformed(MalformedReason::EmptyPath));
    }

    if let Some(key) = record.unknown.keys().next() {
      return Err(malformed(MalformedReason::UnknownField(key.clone())));
    }

    let present: Vec<&'static str> = [
      ("order", record.order.is_some()),
      ("after", record.after.is_some()),
      ("before", record.before.is_some()),
    ]
    .into_iter()
    .filter_map(|(name, set)| set.then_some(name))
    .collect();
    if present.len() > 1 {
      return Err(malformed(MalformedReason::MultipleDirectives(present)));
    }

    let directive = if let Some(order) = record.order.as_deref() {
      match order.trim() {
        "first" => Some(OrderDirective::First),
        "last" => Some(OrderDirective::Last),
        other => return Err(malformed(MalformedReason::UnknownOrder(other.to_string()))),
      }
    } else if let Some(target) = record.after.as_deref() {
      Some(OrderDirective::After(reference(target).ok_or_else(|| {
        malformed(MalformedReason::EmptyReference)
      })?))
    } else if let Some(target) = record.before.as_deref() {
      Some(OrderDirective::Before(reference(target).ok_or_else(|| {
        malformed(MalformedReason::EmptyReference)
      })?))
    } else {
      None
    };

    Ok(Self { path, directive })
  }

  /// True when the descriptor carries `order = first`.
  pub fn is_first(&self) -> bool {
    matches!(self.directive, Some(OrderDirective::First))
  }

  /// True when the descriptor carries `order = last`.
  pub fn is_last(&self) -> bool {
    matches!(self.directive, Some(OrderDirective::Last))
  }
}

fn reference(target: &str) -> Option<String> {
  let normalised = normalise_asset_path(target);
  (!normalised.is_empty()).then_some(normalised)
}

/// Ordering manifest mapping each category to its authored descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Manifest {
  /// Authored descriptors per category; authored order is the tie-break default.
  pub categories: BTreeMap<Category, Vec<DescriptorRecord>>,
}

impl Manifest {
  /// Descriptors authored for `category`, empty when the key is absent.
  pub fn descriptors(&self, category: Category) -> &[DescriptorRecord] {
    self
      .categories
      .get(&category)
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  /// Append each path not already listed as an unconstrained descriptor.
  pub fn with_unlisted<I, S>(mut self, category: Category, paths: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let entries = self.categories.entry(category).or_default();
    for path in paths {
      let normalised = normalise_asset_path(path.as_ref());
      if normalised.is_empty() {
        continue;
      }
      let listed = entries
        .iter()
        .any(|entry| normalise_asset_path(&entry.path) == normalised);
      if !listed {
        entries.push(DescriptorRecord::unconstrained(normalised));
      }
    }
    self
  }
}

/// Fully resolved load order for every category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ResolvedManifest {
  /// Ordered asset paths per category.
  pub categories: BTreeMap<Category, Vec<String>>,
}

impl ResolvedManifest {
  /// Resolved order for `category`, empty when the category was not resolved.
  pub fn order(&self, category: Category) -> &[String] {
    self
      .categories
      .get(&category)
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  /// Plain text listing with a `# <category>` header before each category's paths.
  pub fn render_text(&self) -> String {
    let mut text = String::new();
    for (category, paths) in &self.categories {
      text.push_str("# ");
      text.push_str(category.as_str());
      text.push('\n');
      for path in paths {
        text.push_str(path);
        text.push('\n');
      }
    }
    text
  }
}
