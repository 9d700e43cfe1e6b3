//! Shortest-cycle extraction used to explain why a sort stalled.

use std::collections::{BTreeSet, VecDeque};

use super::graph::ConstraintGraph;

/// Find the shortest directed cycle among `candidates`.
///
/// Ties resolve to the cycle through the lowest-ranked node. The cycle is returned as node
/// indices in traversal order starting at that node; the closing edge back to the first
/// node is implied. Falls back to every candidate when no cycle is found, which only
/// happens if `candidates` is not the residue of a stalled sort.
pub fn shortest_cycle(graph: &ConstraintGraph<'_>, candidates: &BTreeSet<usize>) -> Vec<usize> {
  let mut best: Option<Vec<usize>> = None;

  for &origin in candidates {
    let bound = best.as_ref().map_or(usize::MAX, Vec::len);
    if let Some(cycle) = cycle_through(graph, candidates, origin, bound)
      && best.as_ref().is_none_or(|current| cycle.len() < current.len())
    {
      best = Some(cycle);
    }
  }

  best.unwrap_or_else(|| candidates.iter().copied().collect())
}

/// Breadth-first search for the shortest path from `origin` back to itself.
fn cycle_through(
  graph: &ConstraintGraph<'_>,
  candidates: &BTreeSet<usize>,
  origin: usize,
  bound: usize,
) -> Option<Vec<usize>> {
  let mut parent = vec![None; graph.len()];
  let mut depth = vec![0usize; graph.len()];
  let mut queue = VecDeque::from([origin]);

  while let Some(current) = queue.pop_front() {
    if depth[current] + 1 >= bound {
      continue;
    }
    for next in graph.successors(current) {
      if !candidates.contains(&next) {
        continue;
      }
      if next == origin {
        let mut cycle = vec![current];
        let mut cursor = current;
        while let Some(previous) = parent[cursor] {
          cycle.push(previous);
          cursor = previous;
        }
        cycle.reverse();
        return Some(cycle);
      }
      if parent[next].is_none() {
        parent[next] = Some(current);
        depth[next] = depth[current] + 1;
        queue.push_back(next);
      }
    }
  }

  None
}
