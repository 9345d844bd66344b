//! Async selection flows. Each flow talks to the backend through [`ApiClient`]
//! and reports back exclusively by emitting actions in a fixed order through
//! the caller-supplied dispatcher.

use crate::api::ApiClient;
use crate::shape::group_meta_paths;
use crate::state::Action;
use crate::types::DrugPrediction;

/// Select a disease and refresh its ranked drug predictions.
///
/// Dispatch order: loading on, `ChangeDisease`, `ChangeDrug(None)`, then after
/// the prediction fetch resolves `LoadDrugOptions` (empty list on failure),
/// then loading off. An empty `disease_id` emits nothing.
///
/// `generation` tags the result actions; pass the value minted by
/// [`Store::begin_selection`](crate::state::Store::begin_selection) so that a
/// selection superseded mid-flight is dropped at the reducer.
pub async fn select_disease(
    client: &ApiClient,
    disease_id: &str,
    generation: u64,
    dispatch: &mut impl FnMut(Action),
) {
    if disease_id.trim().is_empty() {
        log::warn!("ignoring disease selection with an empty id");
        return;
    }

    dispatch(Action::SetLoading {
        generation,
        drug: Some(true),
        attention: Some(true),
    });
    dispatch(Action::ChangeDisease(disease_id.to_string()));
    dispatch(Action::ChangeDrug(None));

    let predictions: Vec<DrugPrediction> = client
        .drug_predictions(disease_id)
        .await
        .into_iter()
        .map(|p| DrugPrediction {
            selected: false,
            ..p
        })
        .collect();
    log::debug!(
        "loaded {} drug predictions for disease {}",
        predictions.len(),
        disease_id
    );

    dispatch(Action::LoadDrugOptions {
        generation,
        predictions,
    });
    dispatch(Action::SetLoading {
        generation,
        drug: Some(false),
        attention: Some(false),
    });
}

/// Add a drug to the comparison or remove it again.
///
/// Requires a selected disease; a `None` or blank disease id emits nothing.
/// Always dispatches `ChangeDrug` first. Adding fetches the attention pair,
/// groups its paths, and dispatches `AddAttentionPaths` between the loading
/// on/off pair; removing dispatches `DelAttentionPaths` with no network
/// traffic.
pub async fn select_drug(
    client: &ApiClient,
    drug_id: &str,
    disease_id: Option<&str>,
    is_add: bool,
    generation: u64,
    dispatch: &mut impl FnMut(Action),
) {
    let disease_id = match disease_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => {
            log::warn!("ignoring drug selection without a selected disease");
            return;
        }
    };

    dispatch(Action::ChangeDrug(Some(drug_id.to_string())));

    if is_add {
        dispatch(Action::SetLoading {
            generation,
            drug: None,
            attention: Some(true),
        });

        let pair = client.attention_pair(disease_id, drug_id).await;
        dispatch(Action::AddAttentionPaths {
            generation,
            drug_id: drug_id.to_string(),
            attention: pair.attention,
            groups: group_meta_paths(pair.paths),
        });

        dispatch(Action::SetLoading {
            generation,
            drug: None,
            attention: Some(false),
        });
    } else {
        dispatch(Action::DelAttentionPaths {
            drug_id: drug_id.to_string(),
        });
    }
}
