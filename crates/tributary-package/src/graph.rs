use std::collections::{HashMap, HashSet};

/// Task dependency structure of a package.
#[derive(Debug, Clone)]
pub struct Graph {
  /// Adjacency list: task_id -> list of downstream task_ids.
  adjacency: HashMap<String, Vec<String>>,
  /// Tasks with no incoming edges, in declaration order.
  entry_points: Vec<String>,
}

impl Graph {
  /// Build a graph from task ids (in declaration order) and edges.
  pub fn new<'a>(task_ids: impl IntoIterator<Item = &'a str>, edges: &[(String, String)]) -> Self {
    let task_ids: Vec<&str> = task_ids.into_iter().collect();
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
    let mut has_upstream: HashSet<&str> = HashSet::new();

    for task_id in &task_ids {
      adjacency.entry(task_id.to_string()).or_default();
    }

    for (from, to) in edges {
      let downstream = adjacency.entry(from.clone()).or_default();
      if !downstream.contains(to) {
        downstream.push(to.clone());
      }
      has_upstream.insert(to.as_str());
    }

    let entry_points = task_ids
      .iter()
      .filter(|id| !has_upstream.contains(**id))
      .map(|id| id.to_string())
      .collect();

    Self {
      adjacency,
      entry_points,
    }
  }

  /// Tasks with no incoming edges.
  pub fn entry_points(&self) -> &[String] {
    &self.entry_points
  }

  pub fn downstream(&self, task_id: &str) -> &[String] {
    self
      .adjacency
      .get(task_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }
}
