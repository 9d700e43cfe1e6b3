//! Helpers used to filter which discovered assets join the load order.

use std::collections::BTreeSet;

/// Trait describing selection filters for discovered assets.
pub trait AssetInclusion {
  /// Returns `true` when the asset should be added to the manifest.
  fn is_included(&self, path: &str) -> bool;
}

/// Selection helper scoping discovery by directory-aware path prefixes.
#[derive(Debug, Clone, Default)]
pub struct AssetSelection {
  include: Option<BTreeSet<String>>,
  exclude: BTreeSet<String>,
}

impl AssetSelection {
  /// Build a selection from raw include and exclude rules.
  ///
  /// An empty include list means every asset is included unless excluded.
  pub fn from_lists<I, E>(include: I, exclude: E) -> Self
  where
    I: IntoIterator<Item = String>,
    E: IntoIterator<Item = String>,
  {
    let include = normalise_list(include);
    let exclude = normalise_list(exclude);

    Self {
      include: (!include.is_empty()).then_some(include),
      exclude,
    }
  }

  /// Determine whether a discovered asset should be added to the manifest.
  pub fn is_included(&self, path: &str) -> bool {
    if self.exclude.iter().any(|value| scope_matches(value, path)) {
      return false;
    }

    match &self.include {
      Some(include) => include.iter().any(|value| scope_matches(value, path)),
      None => true,
    }
  }

  /// Returns true when no filtering rules are active.
  pub fn is_unfiltered(&self) -> bool {
    self.include.is_none() && self.exclude.is_empty()
  }
}

impl AssetInclusion for AssetSelection {
  fn is_included(&self, path: &str) -> bool {
    AssetSelection::is_included(self, path)
  }
}

/// Convert a list of raw rules into a sorted, de-duplicated set.
///
/// Values are trimmed and empty entries are discarded to simplify downstream filtering logic.
fn normalise_list(values: impl IntoIterator<Item = String>) -> BTreeSet<String> {
  values
    .into_iter()
    .map(|value| value.trim().trim_matches('/').to_string())
    .filter(|value| !value.is_empty())
    .collect()
}

fn scope_matches(rule: &str, candidate: &str) -> bool {
  if candidate == rule {
    return true;
  }

  candidate
    .strip_prefix(rule)
    .is_some_and(|suffix| suffix.starts_with('/'))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn selection(include: &[&str], exclude: &[&str]) -> AssetSelection {
    AssetSelection::from_lists(
      include.iter().map(|value| value.to_string()),
      exclude.iter().map(|value| value.to_string()),
    )
  }

  #[test]
  fn defaults_to_including_all_assets() {
    let selection = AssetSelection::default();
    assert!(selection.is_included("any.js"));
    assert!(selection.is_unfiltered());
  }

  #[test]
  fn excludes_directories_with_nested_files() {
    let selection = selection(&[], &["legacy", "", " vendor/old/ "]);

    assert!(!selection.is_included("legacy/shim.js"));
    assert!(!selection.is_included("vendor/old/jquery.js"));
    assert!(selection.is_included("vendor/new/jquery.js"));
    assert!(selection.is_included("legacy-shim.js"));
  }

  #[test]
  fn include_rules_limit_discovery() {
    let selection = selection(&["jquery", "angular/angular.min.js"], &[]);

    assert!(selection.is_included("jquery/jquery-ui.js"));
    assert!(selection.is_included("angular/angular.min.js"));
    assert!(!selection.is_included("angular/angular-route.min.js"));
    assert!(!selection.is_unfiltered());
  }

  #[test]
  fn exclusions_win_over_inclusions() {
    let selection = selection(&["jquery"], &["jquery/plugins"]);

    assert!(selection.is_included("jquery/jquery.js"));
    assert!(!selection.is_included("jquery/plugins/chosen.js"));
  }

  #[test]
  fn normalises_whitespace_and_duplicates() {
    let normalised: Vec<String> = normalise_list(vec![
      "  a  ".into(),
      "b/".into(),
      "a".into(),
      String::new(),
    ])
    .into_iter()
    .collect();

    assert_eq!(normalised, vec![String::from("a"), String::from("b")]);
  }
}
