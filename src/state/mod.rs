//! Explorer state: an explicit action enum and a pure transition function.
//!
//! There is no global mutable store. `reduce` consumes the current state and
//! one `Action` and returns the next state; `Store` is a thin owner that wires
//! `dispatch` to `reduce` and mints selection generations. Async flows live in
//! [`actions`] and communicate with the state exclusively by emitting actions.

pub mod actions;

use std::collections::HashMap;
use std::mem;

use crate::cache::MetaPathCache;
use crate::shape::metapath::{
    summarize_meta_paths, toggle_meta_path_expand, toggle_meta_path_hide,
};
use crate::types::{
    AttentionMap, DiseaseOption, DrugPrediction, EdgeTypes, MetaPath, MetaPathSummary,
    NodeNameDict,
};

/// Every event the explorer state responds to.
///
/// Results of async flows (`LoadDrugOptions`, `AddAttentionPaths`,
/// `SetLoading`) carry the selection generation they were issued under;
/// `reduce` drops them when a newer selection has started since.
#[derive(Debug, Clone)]
pub enum Action {
    LoadNodeTypes(Vec<String>),
    LoadEdgeTypes(EdgeTypes),
    LoadNodeNameDict(NodeNameDict),
    LoadDiseaseOptions(Vec<DiseaseOption>),
    LoadDrugOptions {
        generation: u64,
        predictions: Vec<DrugPrediction>,
    },
    AddAttentionPaths {
        generation: u64,
        drug_id: String,
        attention: AttentionMap,
        groups: Vec<MetaPath>,
    },
    DelAttentionPaths {
        drug_id: String,
    },
    SetLoading {
        generation: u64,
        drug: Option<bool>,
        attention: Option<bool>,
    },
    ChangeDisease(String),
    ChangeDrug(Option<String>),
    ChangeEdgeThreshold(f64),
    SelectPathNodes(Vec<String>),
    ToggleMetaPathHide(usize),
    ToggleMetaPathExpand(usize),
}

/// Full client-side state of the explorer.
#[derive(Debug)]
pub struct AppState {
    pub node_types: Vec<String>,
    pub edge_types: EdgeTypes,
    pub node_name_dict: NodeNameDict,
    pub disease_options: Vec<DiseaseOption>,
    pub drug_predictions: Vec<DrugPrediction>,
    pub selected_disease: Option<String>,
    pub selected_drug: Option<String>,
    /// Drugs currently added to the comparison, in the order they were added.
    pub selected_drugs: Vec<String>,
    /// Attention trees keyed by anchor node id.
    pub attention: AttentionMap,
    /// Grouped explanation paths per added drug.
    pub meta_path_groups: HashMap<String, Vec<MetaPath>>,
    /// One row per node-type signature across all added drugs.
    pub meta_path_summaries: Vec<MetaPathSummary>,
    pub selected_path_nodes: Vec<String>,
    pub edge_threshold: f64,
    pub is_drug_loading: bool,
    pub is_attention_loading: bool,
    pub meta_path_cache: MetaPathCache,
    /// Monotonic counter identifying the current selection scope.
    pub selection_generation: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            node_types: Vec::new(),
            edge_types: EdgeTypes::new(),
            node_name_dict: NodeNameDict::new(),
            disease_options: Vec::new(),
            drug_predictions: Vec::new(),
            selected_disease: None,
            selected_drug: None,
            selected_drugs: Vec::new(),
            attention: AttentionMap::new(),
            meta_path_groups: HashMap::new(),
            meta_path_summaries: Vec::new(),
            selected_path_nodes: Vec::new(),
            edge_threshold: 0.5,
            is_drug_loading: false,
            is_attention_loading: false,
            meta_path_cache: MetaPathCache::new(),
            selection_generation: 0,
        }
    }
}

impl AppState {
    /// Previously grouped paths for a disease/drug pair, if this session has
    /// already fetched them. The cache survives deselecting the drug.
    pub fn cached_meta_paths(&self, disease_id: &str, drug_id: &str) -> Option<&Vec<MetaPath>> {
        self.meta_path_cache.get(disease_id, drug_id)
    }
}

/// Apply one action to the state and return the next state.
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::LoadNodeTypes(node_types) => state.node_types = node_types,
        Action::LoadEdgeTypes(edge_types) => state.edge_types = edge_types,
        Action::LoadNodeNameDict(dict) => state.node_name_dict = dict,
        Action::LoadDiseaseOptions(options) => state.disease_options = options,

        Action::LoadDrugOptions {
            generation,
            predictions,
        } => {
            if generation == state.selection_generation {
                state.drug_predictions = predictions;
            } else {
                log::debug!(
                    "dropping drug options from generation {} (current {})",
                    generation,
                    state.selection_generation
                );
            }
        }

        Action::AddAttentionPaths {
            generation,
            drug_id,
            attention,
            groups,
        } => {
            if generation != state.selection_generation {
                log::debug!(
                    "dropping attention paths for {} from generation {} (current {})",
                    drug_id,
                    generation,
                    state.selection_generation
                );
                return state;
            }
            state.attention.extend(attention);
            if !state.selected_drugs.contains(&drug_id) {
                state.selected_drugs.push(drug_id.clone());
            }
            if let Some(prediction) = state
                .drug_predictions
                .iter_mut()
                .find(|p| p.id == drug_id)
            {
                prediction.selected = true;
            }
            if let Some(disease_id) = &state.selected_disease {
                state
                    .meta_path_cache
                    .insert(disease_id, &drug_id, groups.clone());
            }
            state.meta_path_groups.insert(drug_id, groups);
            let summaries = rebuild_summaries(&state);
            state.meta_path_summaries = summaries;
        }

        Action::DelAttentionPaths { drug_id } => {
            state.attention.remove(&drug_id);
            state.meta_path_groups.remove(&drug_id);
            state.selected_drugs.retain(|d| d != &drug_id);
            if let Some(prediction) = state
                .drug_predictions
                .iter_mut()
                .find(|p| p.id == drug_id)
            {
                prediction.selected = false;
            }
            let summaries = rebuild_summaries(&state);
            state.meta_path_summaries = summaries;
        }

        Action::SetLoading {
            generation,
            drug,
            attention,
        } => {
            if generation == state.selection_generation {
                if let Some(value) = drug {
                    state.is_drug_loading = value;
                }
                if let Some(value) = attention {
                    state.is_attention_loading = value;
                }
            } else {
                log::debug!(
                    "dropping loading flags from generation {} (current {})",
                    generation,
                    state.selection_generation
                );
            }
        }

        Action::ChangeDisease(disease_id) => {
            state.selected_disease = Some(disease_id);
            state.drug_predictions = Vec::new();
            state.selected_drugs = Vec::new();
            state.attention = AttentionMap::new();
            state.meta_path_groups = HashMap::new();
            state.meta_path_summaries = Vec::new();
            state.selected_path_nodes = Vec::new();
        }

        Action::ChangeDrug(drug_id) => state.selected_drug = drug_id,

        Action::ChangeEdgeThreshold(threshold) => state.edge_threshold = threshold,

        Action::SelectPathNodes(nodes) => state.selected_path_nodes = nodes,

        Action::ToggleMetaPathHide(idx) => {
            state.meta_path_summaries =
                toggle_meta_path_hide(mem::take(&mut state.meta_path_summaries), idx);
        }

        Action::ToggleMetaPathExpand(idx) => {
            state.meta_path_summaries =
                toggle_meta_path_expand(mem::take(&mut state.meta_path_summaries), idx);
        }
    }

    state
}

/// Recompute summary rows from the groups of every added drug, in the order
/// the drugs were added. Rows merge across drugs by signature.
fn rebuild_summaries(state: &AppState) -> Vec<MetaPathSummary> {
    let groups = state
        .selected_drugs
        .iter()
        .filter_map(|drug_id| state.meta_path_groups.get(drug_id))
        .flatten();
    summarize_meta_paths(groups)
}

/// Owner of the state. Serializes dispatch and mints selection generations.
#[derive(Debug, Default)]
pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new() -> Self {
        Self {
            state: AppState::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Open a new selection scope. Async results issued under earlier
    /// generations will be dropped by `reduce` when they land.
    pub fn begin_selection(&mut self) -> u64 {
        self.state.selection_generation += 1;
        self.state.selection_generation
    }

    pub fn generation(&self) -> u64 {
        self.state.selection_generation
    }

    pub fn dispatch(&mut self, action: Action) {
        let state = mem::take(&mut self.state);
        self.state = reduce(state, action);
    }
}
