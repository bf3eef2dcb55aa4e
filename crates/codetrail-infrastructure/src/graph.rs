//! Dependency-graph algorithms over the `Blocks` subgraph of tasks.
//!
//! Only [`DependencyType::Blocks`] edges participate; `Suggests` and
//! `RelatesTo` edges are informational and never affect ordering.

use std::collections::{HashMap, HashSet, VecDeque};

use codetrail_domain::entities::{Dependency, DependencyType, TaskId};
use codetrail_domain::error::{Error, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

/// A `blocks` subgraph built from a task set and its dependency edges.
///
/// Edges run `depends_on -> task_id`, i.e. in execution order: an edge must
/// be traversed (its source completed) before its target can run.
pub struct TaskGraph {
    graph: DiGraph<TaskId, ()>,
    index_of: HashMap<TaskId, NodeIndex>,
}

impl TaskGraph {
    /// Build a graph from every task id and the `Blocks` edges among them.
    /// Edges whose endpoints are not in `task_ids` are ignored.
    #[must_use]
    pub fn build(task_ids: &[TaskId], dependencies: &[Dependency]) -> Self {
        let mut graph = DiGraph::new();
        let mut index_of = HashMap::new();
        for &id in task_ids {
            index_of.insert(id, graph.add_node(id));
        }
        for dep in dependencies {
            if dep.dependency_type != DependencyType::Blocks {
                continue;
            }
            if let (Some(&from), Some(&to)) =
                (index_of.get(&dep.depends_on), index_of.get(&dep.task_id))
            {
                graph.add_edge(from, to, ());
            }
        }
        Self { graph, index_of }
    }

    /// Topologically ordered task ids such that every task appears after
    /// everything it depends on. Returns [`Error::CycleDetected`] if the
    /// `blocks` subgraph is not a DAG.
    pub fn execution_order(&self) -> Result<Vec<TaskId>> {
        let mut in_degree: HashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|n| (n, self.graph.edges_directed(n, Direction::Incoming).count()))
            .collect();

        let mut ready: VecDeque<NodeIndex> = in_degree
            .iter()
            .filter(|(_, &deg)| deg == 0)
            .map(|(&n, _)| n)
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(node) = ready.pop_front() {
            order.push(self.graph[node]);
            for edge in self.graph.edges_directed(node, Direction::Outgoing) {
                let target = edge.target();
                let degree = in_degree.get_mut(&target).expect("node present");
                *degree -= 1;
                if *degree == 0 {
                    ready.push_back(target);
                }
            }
        }

        if order.len() != self.graph.node_count() {
            return Err(Error::cycle_detected(
                "task dependency graph contains a cycle",
            ));
        }
        Ok(order)
    }

    /// Partition tasks into levels that can each run in parallel: level 0 has
    /// no unresolved dependencies, level N depends only on tasks in levels
    /// `< N`.
    pub fn parallel_groups(&self) -> Result<Vec<Vec<TaskId>>> {
        let order = self.execution_order()?;
        let mut level_of: HashMap<TaskId, usize> = HashMap::new();
        for &task_id in &order {
            let node = self.index_of[&task_id];
            let level = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|edge| level_of[&self.graph[edge.source()]] + 1)
                .max()
                .unwrap_or(0);
            level_of.insert(task_id, level);
        }

        let max_level = level_of.values().copied().max().unwrap_or(0);
        let mut groups = vec![Vec::new(); max_level + 1];
        for &task_id in &order {
            groups[level_of[&task_id]].push(task_id);
        }
        Ok(groups)
    }

    /// Longest dependency chain by cumulative `duration_minutes(task_id)`,
    /// returned as the ordered sequence of task ids on that chain.
    pub fn critical_path<F>(&self, duration_minutes: F) -> Result<Vec<TaskId>>
    where
        F: Fn(TaskId) -> u32,
    {
        let order = self.execution_order()?;
        let mut best: HashMap<TaskId, u32> = HashMap::new();
        let mut predecessor: HashMap<TaskId, TaskId> = HashMap::new();

        for &task_id in &order {
            let own = duration_minutes(task_id);
            let node = self.index_of[&task_id];
            let mut best_here = own;
            let mut best_pred = None;
            for edge in self.graph.edges_directed(node, Direction::Incoming) {
                let source = self.graph[edge.source()];
                let candidate = best[&source] + own;
                if candidate > best_here {
                    best_here = candidate;
                    best_pred = Some(source);
                }
            }
            best.insert(task_id, best_here);
            if let Some(pred) = best_pred {
                predecessor.insert(task_id, pred);
            }
        }

        let Some(&end) = best.iter().max_by_key(|(_, &v)| v).map(|(k, _)| k) else {
            return Ok(Vec::new());
        };

        let mut path = vec![end];
        let mut current = end;
        while let Some(&pred) = predecessor.get(&current) {
            path.push(pred);
            current = pred;
        }
        path.reverse();
        Ok(path)
    }

    /// Whether adding a `blocks` edge `depends_on -> task_id` to the current
    /// graph would introduce a cycle, without mutating it. Used to validate a
    /// dependency before it is persisted.
    #[must_use]
    pub fn would_cycle(&self, task_id: TaskId, depends_on: TaskId) -> bool {
        if task_id == depends_on {
            return true;
        }
        let Some(&start) = self.index_of.get(&task_id) else {
            return false;
        };
        let Some(&target) = self.index_of.get(&depends_on) else {
            return false;
        };

        let mut visited = HashSet::new();
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if node == target {
                return true;
            }
            if !visited.insert(node) {
                continue;
            }
            stack.extend(self.graph.edges_directed(node, Direction::Outgoing).map(|e| e.target()));
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<TaskId> {
        (0..n).map(|i| TaskId::from_name(&format!("t{i}"))).collect()
    }

    #[test]
    fn execution_order_respects_dependencies() {
        let t = ids(3);
        let deps = vec![Dependency::blocks(t[1], t[0]), Dependency::blocks(t[2], t[1])];
        let graph = TaskGraph::build(&t, &deps);
        let order = graph.execution_order().unwrap();
        assert_eq!(order, vec![t[0], t[1], t[2]]);
    }

    #[test]
    fn detects_cycle() {
        let t = ids(2);
        let deps = vec![Dependency::blocks(t[0], t[1]), Dependency::blocks(t[1], t[0])];
        let graph = TaskGraph::build(&t, &deps);
        assert!(graph.execution_order().is_err());
    }

    #[test]
    fn parallel_groups_separates_independent_tasks() {
        let t = ids(3);
        let deps = vec![Dependency::blocks(t[2], t[0]), Dependency::blocks(t[2], t[1])];
        let graph = TaskGraph::build(&t, &deps);
        let groups = graph.parallel_groups().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1], vec![t[2]]);
    }

    #[test]
    fn critical_path_follows_longest_weighted_chain() {
        let t = ids(3);
        let deps = vec![Dependency::blocks(t[1], t[0]), Dependency::blocks(t[2], t[1])];
        let graph = TaskGraph::build(&t, &deps);
        let durations: HashMap<TaskId, u32> = [(t[0], 10), (t[1], 20), (t[2], 5)].into();
        let path = graph.critical_path(|id| durations[&id]).unwrap();
        assert_eq!(path, vec![t[0], t[1], t[2]]);
    }

    #[test]
    fn would_cycle_detects_reverse_edge_without_mutating() {
        let t = ids(2);
        let deps = vec![Dependency::blocks(t[1], t[0])];
        let graph = TaskGraph::build(&t, &deps);
        assert!(graph.would_cycle(t[0], t[1]));
        assert!(!graph.would_cycle(t[1], t[0]));
    }
}
