use crate::types::AttentionTree;

/// Prune an attention tree for display.
///
/// Children scoring below `threshold` are dropped at every depth, then at most
/// `max_children` survivors are kept per node (wire order preserved). The root
/// itself is never removed, whatever its score. Returns a new tree; the input
/// is left untouched.
pub fn prune_edge(
    node: &AttentionTree,
    threshold: f64,
    max_children: Option<usize>,
) -> AttentionTree {
    let limit = max_children.unwrap_or(usize::MAX);
    let children = node
        .children
        .iter()
        .filter(|child| child.score >= threshold)
        .take(limit)
        .map(|child| prune_edge(child, threshold, max_children))
        .collect();
    AttentionTree {
        node_id: node.node_id.clone(),
        node_type: node.node_type.clone(),
        score: node.score,
        edge_info: node.edge_info.clone(),
        children,
    }
}

/// Flatten a tree into its node IDs, depth first, parents before children.
pub fn flat_tree(node: &AttentionTree) -> Vec<String> {
    let mut ids = Vec::new();
    collect_ids(node, &mut ids);
    ids
}

fn collect_ids(node: &AttentionTree, out: &mut Vec<String>) {
    out.push(node.node_id.clone());
    for child in &node.children {
        collect_ids(child, out);
    }
}
