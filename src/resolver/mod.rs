//! Asset order resolution.
//!
//! Each category is an independent ordering problem. Descriptors are validated, turned into a
//! [`ConstraintGraph`] and sorted with authored order as the tie-break, so a manifest without
//! directives resolves to exactly the order it was written in.

mod cycle;
mod graph;

use std::collections::{BTreeMap, HashSet};

use log::debug;

use crate::error::{MalformedReason, ResolveError};
use crate::models::{AssetDescriptor, Category, DescriptorRecord, Manifest, ResolvedManifest};

pub use cycle::shortest_cycle;
pub use graph::{ConstraintGraph, END_LABEL, Node, START_LABEL, SortOutcome};

/// Per-category outcome of resolving a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestResolution {
  /// Resolved order or the error that aborted the category.
  pub categories: BTreeMap<Category, Result<Vec<String>, ResolveError>>,
}

impl ManifestResolution {
  /// Outcome for `category`, if it was part of the manifest.
  pub fn get(&self, category: Category) -> Option<&Result<Vec<String>, ResolveError>> {
    self.categories.get(&category)
  }

  /// Errors of every failed category, in category order.
  pub fn errors(&self) -> impl Iterator<Item = &ResolveError> {
    self
      .categories
      .values()
      .filter_map(|outcome| outcome.as_ref().err())
  }

  /// Only the categories that resolved successfully.
  pub fn resolved(&self) -> ResolvedManifest {
    ResolvedManifest {
      categories: self
        .categories
        .iter()
        .filter_map(|(category, outcome)| {
          outcome.as_ref().ok().map(|order| (*category, order.clone()))
        })
        .collect(),
    }
  }

  /// Convert into the full resolved manifest, or every category error.
  pub fn into_result(self) -> Result<ResolvedManifest, Vec<ResolveError>> {
    let mut resolved = BTreeMap::new();
    let mut errors = Vec::new();
    for (category, outcome) in self.categories {
      match outcome {
        Ok(order) => {
          resolved.insert(category, order);
        }
        Err(err) => errors.push(err),
      }
    }

    if errors.is_empty() {
      Ok(ResolvedManifest {
        categories: resolved,
      })
    } else {
      Err(errors)
    }
  }
}

/// Resolve every category present in the manifest independently.
pub fn resolve_manifest(manifest: &Manifest) -> ManifestResolution {
  ManifestResolution {
    categories: manifest
      .categories
      .iter()
      .map(|(category, records)| (*category, resolve_category(*category, records)))
      .collect(),
  }
}

/// Resolve the load order of one category's authored descriptors.
pub fn resolve_category(
  category: Category,
  records: &[DescriptorRecord],
) -> Result<Vec<String>, ResolveError> {
  let descriptors = validate_descriptors(category, records)?;
  let graph = ConstraintGraph::build(category, &descriptors)?;
  debug!(
    "{category}: resolving {} descriptors over {} nodes and {} edges",
    descriptors.len(),
    graph.len(),
    graph.edge_count()
  );

  match graph.stable_sort() {
    SortOutcome::Complete(order) => Ok(
      order
        .into_iter()
        .filter_map(|index| match graph.node(index) {
          Node::Asset(path) => Some(path.to_string()),
          Node::Start | Node::End => None,
        })
        .collect(),
    ),
    SortOutcome::Stalled(remaining) => {
      debug!("{category}: sort stalled with {} unsorted nodes", remaining.len());
      let cycle = shortest_cycle(&graph, &remaining)
        .into_iter()
        .map(|index| graph.node(index).label().to_string())
        .collect();
      Err(ResolveError::CyclicConstraint { category, cycle })
    }
  }
}

fn validate_descriptors(
  category: Category,
  records: &[DescriptorRecord],
) -> Result<Vec<AssetDescriptor>, ResolveError> {
  let mut seen = HashSet::new();
  let mut descriptors = Vec::with_capacity(records.len());

  for record in records {
    let descriptor = AssetDescriptor::from_record(category, record)?;
    if !seen.insert(descriptor.path.clone()) {
      return Err(ResolveError::MalformedDescriptor {
        category,
        path: descriptor.path,
        reason: MalformedReason::DuplicatePath,
      });
    }
    descriptors.push(descriptor);
  }

  Ok(descriptors)
}
