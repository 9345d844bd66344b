//! Pure shaping helpers for attention trees, explanation paths, and option lists.
//!
//! Everything in this module is side-effect free: functions take references or
//! owned values and return new values, so callers can shape server payloads for
//! display without touching the originals.

pub mod metapath;
pub mod tree;

pub use metapath::{
    group_meta_paths, summarize_meta_paths, toggle_meta_path_expand, toggle_meta_path_hide,
};
pub use tree::{flat_tree, prune_edge};

/// Disease names hidden from the selectable options list. These are umbrella
/// categories too broad to produce a meaningful prediction.
pub const EXCLUDED_DISEASES: [&str; 8] = [
    "mendelian disease",
    "disease of cell nucleous",
    "hip region disease",
    "acute disease",
    "vector borne disease",
    "cancer",
    "sex-linked disease",
    "movement disorder",
];

/// Logistic squash of a raw model score into (0, 1).
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Whether a disease name belongs to the excluded umbrella categories.
/// Unknown names (`None`) are kept.
pub fn is_excluded_disease(disease_name: Option<&str>) -> bool {
    match disease_name {
        Some(name) => {
            let lowered = name.to_lowercase();
            EXCLUDED_DISEASES.contains(&lowered.as_str())
        }
        None => false,
    }
}

/// Uppercase the first character of a label, leaving the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
