//! Errors raised while resolving a category's load order.

use std::fmt;

use thiserror::Error;

use crate::models::Category;

/// Failure that aborts resolution of a single category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  /// An `after`/`before` directive names a path absent from the category.
  #[error("{category}: `{path}` references missing asset `{target}`")]
  UnresolvedReference {
    /// Category being resolved.
    category: Category,
    /// Descriptor carrying the directive.
    path: String,
    /// Missing target path.
    target: String,
  },
  /// The ordering constraints cannot all be satisfied.
  #[error("{category}: ordering constraints form a cycle: {}", CycleDisplay(.cycle))]
  CyclicConstraint {
    /// Category being resolved.
    category: Category,
    /// Nodes of the shortest offending cycle in traversal order.
    cycle: Vec<String>,
  },
  /// A descriptor violates the manifest data model.
  #[error("{category}: malformed descriptor `{path}`: {reason}")]
  MalformedDescriptor {
    /// Category being resolved.
    category: Category,
    /// Offending descriptor path (normalised).
    path: String,
    /// What is wrong with the descriptor.
    reason: MalformedReason,
  },
}

impl ResolveError {
  /// Category the error belongs to.
  pub fn category(&self) -> Category {
    match self {
      Self::UnresolvedReference { category, .. }
      | Self::CyclicConstraint { category, .. }
      | Self::MalformedDescriptor { category, .. } => *category,
    }
  }
}

/// Reason a descriptor was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
  /// More than one of `order`, `after` and `before` was given.
  #[error("conflicting directives: {}", .0.join(", "))]
  MultipleDirectives(Vec<&'static str>),
  /// `order` was neither `first` nor `last`.
  #[error("unknown order `{0}`, expected `first` or `last`")]
  UnknownOrder(String),
  /// The descriptor path is empty or missing.
  #[error("empty path")]
  EmptyPath,
  /// The descriptor carries a key other than `path`, `order`, `after` or `before`.
  #[error("unknown field `{0}`")]
  UnknownField(String),
  /// An `after`/`before` directive names an empty path.
  #[error("empty reference")]
  EmptyReference,
  /// The path is listed more than once in the category.
  #[error("duplicate path")]
  DuplicatePath,
}

struct CycleDisplay<'a>(&'a [String]);

impl fmt::Display for CycleDisplay<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let Some(head) = self.0.first() else {
      return Ok(());
    };
    for node in self.0 {
      write!(f, "{node} -> ")?;
    }
    f.write_str(head)
  }
}
