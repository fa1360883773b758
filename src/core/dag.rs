//! Validation of the task dependency graph.
//!
//! A crew is only runnable when task ids are unique, every dependency refers
//! to a declared task and the dependency relation is acyclic.

use super::task::{Task, TaskId};
use crate::errors::{Error, Result};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Checks the dependency graph of `tasks` and returns a topological order
/// (indices into `tasks`).
pub fn validate(tasks: &[Task]) -> Result<Vec<usize>> {
    let mut graph: DiGraph<usize, ()> = DiGraph::new();
    let mut node_map: HashMap<&TaskId, NodeIndex> = HashMap::new();

    for (idx, task) in tasks.iter().enumerate() {
        let node = graph.add_node(idx);
        if node_map.insert(&task.id, node).is_some() {
            return Err(Error::Config(format!("duplicate task id '{}'", task.id)));
        }
    }

    for task in tasks {
        let to = node_map[&task.id];
        for dep in &task.dependencies {
            if dep == &task.id {
                return Err(Error::Config(format!(
                    "circular dependency detected: task '{}' depends on itself",
                    task.id
                )));
            }
            let from = node_map.get(dep).ok_or_else(|| {
                Error::Config(format!(
                    "task '{}' depends on unknown task '{}'",
                    task.id, dep
                ))
            })?;
            // Edge direction: dependency -> dependent
            graph.add_edge(*from, to, ());
        }
    }

    match toposort(&graph, None) {
        Ok(order) => Ok(order.into_iter().map(|n| graph[n]).collect()),
        Err(cycle) => {
            let task = &tasks[graph[cycle.node_id()]];
            Err(Error::Config(format!(
                "circular dependency detected involving task '{}'",
                task.id
            )))
        }
    }
}
