use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{DrugPathError, Result};

/// Attention tree returned by the backend: one node's contribution to the
/// explanation of a disease-drug relationship, with scored children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttentionTree {
    pub node_id: String,
    pub node_type: String,
    pub score: f64,
    #[serde(default)]
    pub edge_info: String,
    /// Always present client-side; the wire may omit it on leaves.
    #[serde(default)]
    pub children: Vec<AttentionTree>,
}

/// One node along an explanation path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathNode {
    pub node_id: String,
    pub node_type: String,
}

/// One edge along an explanation path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathEdge {
    #[serde(default)]
    pub edge_info: String,
    #[serde(default)]
    pub score: f64,
}

/// An explanation path through the knowledge graph, with its relevance score.
/// `hide` is a display flag assigned at grouping time, never sent by the wire.
/// `synthetic` marks backend-generated fallback paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub nodes: Vec<PathNode>,
    #[serde(default)]
    pub edges: Vec<PathEdge>,
    #[serde(default, rename = "avg_score")]
    pub score: f64,
    #[serde(default)]
    pub synthetic: bool,
    #[serde(default)]
    pub hide: bool,
}

impl Path {
    /// Node-type signature: the grouping key for meta-path bucketing.
    pub fn node_types(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.node_type.clone()).collect()
    }
}

/// A group of paths sharing one node-type signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaPath {
    pub node_types: Vec<String>,
    pub paths: Vec<Path>,
}

/// Aggregate row for a node-type signature: path count, mean score, and the
/// UI-only hide/expand flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaPathSummary {
    pub node_types: Vec<String>,
    pub count: usize,
    pub avg_score: f64,
    pub hide: bool,
    pub expand: bool,
}

/// A predicted drug for the selected disease. `known` flags an existing
/// indication; `selected` is client-side state, never sent by the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugPrediction {
    pub id: String,
    pub score: f64,
    #[serde(default)]
    pub known: bool,
    #[serde(default)]
    pub selected: bool,
}

/// One entry of `disease_options.json`. The backend serializes these as
/// `[id, treatable]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, bool)")]
pub struct DiseaseOption {
    pub id: String,
    pub treatable: bool,
}

impl From<(String, bool)> for DiseaseOption {
    fn from((id, treatable): (String, bool)) -> Self {
        Self { id, treatable }
    }
}

/// Metadata for one edge type of the knowledge graph. Both fields are
/// tolerated absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeTypeInfo {
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default, rename = "edgeInfo")]
    pub edge_info: String,
}

/// Edge-type key -> metadata, as served by `edge_types.json`.
pub type EdgeTypes = HashMap<String, EdgeTypeInfo>;

/// Node type -> node id -> display name, as served by `node_name_dict.json`.
pub type NodeNameDict = HashMap<String, HashMap<String, String>>;

/// Drug id -> 2-D projection coordinates, as served by `drug_tsne.json`.
pub type EmbeddingMap = HashMap<String, [f64; 2]>;

/// Attention key (typically a drug id) -> attention tree.
pub type AttentionMap = HashMap<String, AttentionTree>;

/// Raw wire shape of the `attention_pair` endpoint. Both fields are optional
/// on the wire; validation happens once, in [`RawAttentionPair::validate`].
#[derive(Debug, Clone, Deserialize)]
pub struct RawAttentionPair {
    pub attention: Option<AttentionMap>,
    pub paths: Option<Vec<Path>>,
}

/// Validated `attention_pair` response: all fields present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttentionPair {
    pub attention: AttentionMap,
    pub paths: Vec<Path>,
}

impl RawAttentionPair {
    /// Decide validity once at the data-access boundary: a missing `attention`
    /// field is an invalid response; a missing `paths` field alone defaults to
    /// empty.
    pub fn validate(self) -> Result<AttentionPair> {
        match self.attention {
            Some(attention) => Ok(AttentionPair {
                attention,
                paths: self.paths.unwrap_or_default(),
            }),
            None => Err(DrugPathError::InvalidPayload(
                "attention_pair response missing `attention` field".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attention_tree_from_wire() {
        let json = r#"{
            "nodeId": "D1",
            "nodeType": "disease",
            "score": 1.0,
            "edgeInfo": "",
            "children": [
                {"nodeId": "G1", "nodeType": "gene/protein", "score": 0.4, "edgeInfo": "disease_protein"}
            ]
        }"#;
        let tree: AttentionTree = serde_json::from_str(json).unwrap();
        assert_eq!(tree.node_id, "D1");
        assert_eq!(tree.children.len(), 1);
        // leaf had no "children" key: defaults to empty
        assert!(tree.children[0].children.is_empty());
        assert_eq!(tree.children[0].node_type, "gene/protein");
    }

    #[test]
    fn test_path_from_wire_defaults() {
        let json = r#"{
            "nodes": [
                {"nodeId": "D1", "nodeType": "disease"},
                {"nodeId": "P1", "nodeType": "gene/protein"},
                {"nodeId": "R1", "nodeType": "drug"}
            ],
            "edges": [
                {"edgeInfo": "disease_protein", "score": 0.7},
                {"edgeInfo": "drug_protein", "score": 0.7}
            ],
            "avg_score": 0.7
        }"#;
        let path: Path = serde_json::from_str(json).unwrap();
        assert_eq!(path.nodes.len(), 3);
        assert_eq!(path.score, 0.7);
        assert!(!path.synthetic);
        assert!(!path.hide);
        assert_eq!(
            path.node_types(),
            vec!["disease", "gene/protein", "drug"]
        );
    }

    #[test]
    fn test_drug_prediction_from_wire() {
        let json = r#"[{"score": 0.91, "id": "DB00915", "known": true}, {"score": 0.5, "id": "DB01234"}]"#;
        let preds: Vec<DrugPrediction> = serde_json::from_str(json).unwrap();
        assert_eq!(preds.len(), 2);
        assert!(preds[0].known);
        assert!(!preds[0].selected);
        assert!(!preds[1].known);
    }

    #[test]
    fn test_disease_option_from_tuple() {
        let json = r#"[["11989.0", true], ["8170.0", false]]"#;
        let options: Vec<DiseaseOption> = serde_json::from_str(json).unwrap();
        assert_eq!(options[0].id, "11989.0");
        assert!(options[0].treatable);
        assert!(!options[1].treatable);
    }

    #[test]
    fn test_attention_pair_validate_ok() {
        let raw: RawAttentionPair = serde_json::from_str(r#"{"attention": {}}"#).unwrap();
        let pair = raw.validate().unwrap();
        assert!(pair.attention.is_empty());
        assert!(pair.paths.is_empty());
    }

    #[test]
    fn test_attention_pair_validate_missing_attention() {
        let raw: RawAttentionPair = serde_json::from_str(r#"{"paths": []}"#).unwrap();
        let err = raw.validate().unwrap_err();
        assert!(matches!(err, DrugPathError::InvalidPayload(_)));
    }

    #[test]
    fn test_edge_types_tolerates_missing_fields() {
        let json = r#"{"rev_indication": {"nodes": ["drug", "disease"]}, "disease_protein": {}}"#;
        let edge_types: EdgeTypes = serde_json::from_str(json).unwrap();
        assert_eq!(edge_types["rev_indication"].nodes, vec!["drug", "disease"]);
        assert!(edge_types["disease_protein"].edge_info.is_empty());
    }
}
