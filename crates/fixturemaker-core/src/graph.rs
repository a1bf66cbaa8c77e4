use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::ModelCatalog;

/// Summary of the relation graph structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationGraphSummary {
    pub nodes: usize,
    pub edges: usize,
    /// Relations that point back at their own model.
    pub self_references: usize,
}

/// Report for relation dependency ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationGraphReport {
    pub summary: RelationGraphSummary,
    /// Models ordered so related targets come before the models that
    /// reference them.
    pub load_order: Option<Vec<String>>,
    pub cycle: Option<Vec<String>>,
}

/// Build a deterministic relation dependency report for a catalog.
///
/// Unresolvable relations are ignored; run [`crate::validate_catalog`] first
/// to reject them.
pub fn build_relation_graph_report(catalog: &ModelCatalog) -> RelationGraphReport {
    let (graph, self_references) = build_adjacency(catalog);
    let nodes = graph.len();
    let edges = graph.values().map(|targets| targets.len()).sum();
    let summary = RelationGraphSummary {
        nodes,
        edges,
        self_references,
    };

    match toposort(&graph) {
        Ok(order) => RelationGraphReport {
            summary,
            load_order: Some(order),
            cycle: None,
        },
        Err(cycle) => RelationGraphReport {
            summary,
            load_order: None,
            cycle: Some(cycle),
        },
    }
}

fn build_adjacency(catalog: &ModelCatalog) -> (BTreeMap<String, BTreeSet<String>>, usize) {
    let mut graph: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut self_references = 0;

    for model_ref in catalog.model_refs() {
        let model_key = catalog.qualified_name(model_ref);
        graph.entry(model_key.clone()).or_default();

        for field in &catalog.model(model_ref).fields {
            if field.relation_kind().is_none() {
                continue;
            }
            let Ok(target) = catalog.resolve_relation(model_ref, field) else {
                continue;
            };
            if target == model_ref {
                self_references += 1;
                continue;
            }
            graph
                .entry(catalog.qualified_name(target))
                .or_default()
                .insert(model_key.clone());
        }
    }

    (graph, self_references)
}

fn toposort(graph: &BTreeMap<String, BTreeSet<String>>) -> Result<Vec<String>, Vec<String>> {
    let mut indegree: BTreeMap<String, usize> =
        graph.keys().map(|node| (node.clone(), 0)).collect();

    for targets in graph.values() {
        for target in targets {
            *indegree.entry(target.clone()).or_insert(0) += 1;
        }
    }

    let mut ready: BTreeSet<String> = indegree
        .iter()
        .filter_map(|(node, count)| (*count == 0).then(|| node.clone()))
        .collect();

    let mut order = Vec::with_capacity(graph.len());

    while let Some(node) = ready.pop_first() {
        if let Some(targets) = graph.get(&node) {
            for target in targets {
                if let Some(count) = indegree.get_mut(target) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.insert(target.clone());
                    }
                }
            }
        }
        order.push(node);
    }

    if order.len() == graph.len() {
        Ok(order)
    } else {
        let cycle_nodes: Vec<String> = indegree
            .into_iter()
            .filter_map(|(node, count)| (count > 0).then_some(node))
            .collect();
        Err(cycle_nodes)
    }
}
