//! Constraint graph for a single category.
//!
//! `first` and `last` are encoded as edges against two synthetic sentinel nodes so that a
//! single topological sort handles every directive kind. Node indices double as the sort
//! rank: the start sentinel is index `0`, descriptors follow in authored order and the end
//! sentinel is the final index.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap};

use crate::error::ResolveError;
use crate::models::{AssetDescriptor, Category, OrderDirective};

/// Label shown for the start sentinel in cycle reports.
pub const START_LABEL: &str = "<start>";
/// Label shown for the end sentinel in cycle reports.
pub const END_LABEL: &str = "<end>";

/// Node of the constraint graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node<'a> {
  /// Sentinel preceded by `first` descriptors and preceding everything else.
  Start,
  /// Authored descriptor path.
  Asset(&'a str),
  /// Sentinel following everything not marked `last` and preceding `last` descriptors.
  End,
}

impl Node<'_> {
  /// Human readable label used in error reports.
  pub fn label(&self) -> &str {
    match self {
      Self::Start => START_LABEL,
      Self::Asset(path) => path,
      Self::End => END_LABEL,
    }
  }
}

/// Directed graph whose edges `u -> v` require `u` to load before `v`.
#[derive(Debug)]
pub struct ConstraintGraph<'a> {
  nodes: Vec<Node<'a>>,
  successors: Vec<BTreeSet<usize>>,
}

/// Outcome of a topological sort.
#[derive(Debug, PartialEq, Eq)]
pub enum SortOutcome {
  /// Every node was emitted; indices are in load order.
  Complete(Vec<usize>),
  /// The sort stalled; these nodes all sit on or behind a cycle.
  Stalled(BTreeSet<usize>),
}

impl<'a> ConstraintGraph<'a> {
  /// Build the graph for validated descriptors listed in authored order.
  ///
  /// Fails with [`ResolveError::UnresolvedReference`] on the first directive naming a path
  /// that is not part of the category.
  pub fn build(
    category: Category,
    descriptors: &'a [AssetDescriptor],
  ) -> Result<Self, ResolveError> {
    let start = 0;
    let end = descriptors.len() + 1;

    let mut nodes = Vec::with_capacity(descriptors.len() + 2);
    nodes.push(Node::Start);
    nodes.extend(descriptors.iter().map(|d| Node::Asset(d.path.as_str())));
    nodes.push(Node::End);

    let index: HashMap<&str, usize> = descriptors
      .iter()
      .enumerate()
      .map(|(offset, d)| (d.path.as_str(), offset + 1))
      .collect();

    let mut graph = Self {
      successors: vec![BTreeSet::new(); nodes.len()],
      nodes,
    };

    for (offset, descriptor) in descriptors.iter().enumerate() {
      let node = offset + 1;

      if descriptor.is_first() {
        graph.add_edge(node, start);
      } else {
        graph.add_edge(start, node);
      }

      if descriptor.is_last() {
        graph.add_edge(end, node);
      } else {
        graph.add_edge(node, end);
      }

      match &descriptor.directive {
        Some(OrderDirective::After(target)) => {
          let target = lookup(&index, category, descriptor, target)?;
          graph.add_edge(target, node);
        }
        Some(OrderDirective::Before(target)) => {
          let target = lookup(&index, category, descriptor, target)?;
          graph.add_edge(node, target);
        }
        _ => {}
      }
    }

    Ok(graph)
  }

  fn add_edge(&mut self, from: usize, to: usize) {
    self.successors[from].insert(to);
  }

  /// Number of nodes, sentinels included.
  #[allow(clippy::len_without_is_empty)]
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  /// Number of distinct edges.
  pub fn edge_count(&self) -> usize {
    self.successors.iter().map(BTreeSet::len).sum()
  }

  /// Node stored at `index`.
  pub fn node(&self, index: usize) -> Node<'a> {
    self.nodes[index]
  }

  /// Direct successors of `index` in ascending rank.
  pub fn successors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
    self.successors[index].iter().copied()
  }

  /// Stable topological sort: among eligible nodes the lowest rank is emitted first.
  pub fn stable_sort(&self) -> SortOutcome {
    let mut in_degree = vec![0usize; self.nodes.len()];
    for targets in &self.successors {
      for &target in targets {
        in_degree[target] += 1;
      }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
      .iter()
      .enumerate()
      .filter(|(_, degree)| **degree == 0)
      .map(|(index, _)| Reverse(index))
      .collect();

    let mut order = Vec::with_capacity(self.nodes.len());
    while let Some(Reverse(index)) = ready.pop() {
      order.push(index);
      for &target in &self.successors[index] {
        in_degree[target] -= 1;
        if in_degree[target] == 0 {
          ready.push(Reverse(target));
        }
      }
    }

    if order.len() == self.nodes.len() {
      SortOutcome::Complete(order)
    } else {
      SortOutcome::Stalled(
        in_degree
          .iter()
          .enumerate()
          .filter(|(_, degree)| **degree > 0)
          .map(|(index, _)| index)
          .collect(),
      )
    }
  }
}

fn lookup(
  index: &HashMap<&str, usize>,
  category: Category,
  descriptor: &AssetDescriptor,
  target: &str,
) -> Result<usize, ResolveError> {
  index
    .get(target)
    .copied()
    .ok_or_else(|| ResolveError::UnresolvedReference {
      category,
      path: descriptor.path.clone(),
      target: target.to_string(),
    })
}
