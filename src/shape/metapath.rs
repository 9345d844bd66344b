use std::collections::HashMap;

use crate::types::{MetaPath, MetaPathSummary, Path};

/// Bucket explanation paths by their node-type signature.
///
/// One pass over the input: the first path carrying a new signature opens a
/// group, later paths with the same signature append to it, so groups come out
/// in first-appearance order. Every path has its `hide` flag reset on the way
/// in; stale display state from a previous selection must not leak through.
pub fn group_meta_paths(paths: Vec<Path>) -> Vec<MetaPath> {
    let mut groups: Vec<MetaPath> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for mut path in paths {
        path.hide = false;
        let node_types = path.node_types();
        let key = node_types.join("_");
        match seen.get(&key) {
            Some(&idx) => groups[idx].paths.push(path),
            None => {
                seen.insert(key, groups.len());
                groups.push(MetaPath {
                    node_types,
                    paths: vec![path],
                });
            }
        }
    }

    groups
}

/// Collapse groups into one summary row per signature.
///
/// Groups from different drugs may share a signature; their path counts and
/// scores merge into a single row. Rows keep the order signatures first appear
/// in, and both display flags start cleared.
pub fn summarize_meta_paths<'a>(
    groups: impl IntoIterator<Item = &'a MetaPath>,
) -> Vec<MetaPathSummary> {
    let mut summaries: Vec<MetaPathSummary> = Vec::new();
    let mut sums: Vec<f64> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for group in groups {
        let key = group.node_types.join("_");
        let idx = *seen.entry(key).or_insert_with(|| {
            summaries.push(MetaPathSummary {
                node_types: group.node_types.clone(),
                count: 0,
                avg_score: 0.0,
                hide: false,
                expand: false,
            });
            sums.push(0.0);
            summaries.len() - 1
        });
        summaries[idx].count += group.paths.len();
        sums[idx] += group.paths.iter().map(|p| p.score).sum::<f64>();
    }

    for (summary, sum) in summaries.iter_mut().zip(&sums) {
        if summary.count > 0 {
            summary.avg_score = sum / summary.count as f64;
        }
    }

    summaries
}

/// Flip the `hide` flag of the row at `index`, collapsing it as a side rule:
/// a hidden row cannot stay expanded. Out-of-range indices leave the rows as
/// they were.
pub fn toggle_meta_path_hide(
    mut summaries: Vec<MetaPathSummary>,
    index: usize,
) -> Vec<MetaPathSummary> {
    if let Some(summary) = summaries.get_mut(index) {
        summary.hide = !summary.hide;
        if summary.hide {
            summary.expand = false;
        }
    }
    summaries
}

/// Flip the `expand` flag of the row at `index`. Out-of-range indices leave
/// the rows as they were.
pub fn toggle_meta_path_expand(
    mut summaries: Vec<MetaPathSummary>,
    index: usize,
) -> Vec<MetaPathSummary> {
    if let Some(summary) = summaries.get_mut(index) {
        summary.expand = !summary.expand;
    }
    summaries
}
