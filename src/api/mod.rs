use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::{DrugPathError, Result};
use crate::types::{
    AttentionMap, AttentionPair, DiseaseOption, DrugPrediction, EdgeTypes, EmbeddingMap,
    NodeNameDict, RawAttentionPair,
};

/// HTTP client for the explorer backend.
///
/// Wraps a single `reqwest::Client` plus the two URL prefixes requests fan
/// out from: the static data directory (pre-exported JSON files) and the
/// dynamic `api/` endpoints. Every public accessor recovers from failure by
/// logging a warning and returning an empty value of the right shape, so a
/// slow or missing backend degrades the view instead of aborting it.
pub struct ApiClient {
    http: Client,
    data_base: Url,
    api_base: Url,
}

impl ApiClient {
    /// Create a client for the given backend.
    ///
    /// `base_url` must be an absolute http(s) URL; `data_path` is the
    /// directory under it holding the static JSON exports.
    pub fn new(base_url: &str, data_path: &str, timeout_secs: u64) -> Result<Self> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base: Url = base.parse()?;

        let data_path = data_path.trim_matches('/');
        let data_base = if data_path.is_empty() {
            base.clone()
        } else {
            base.join(&format!("{}/", data_path))?
        };
        let api_base = base.join("api/")?;

        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            data_base,
            api_base,
        })
    }

    /// Create a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.base_url(),
            config.data_path(),
            config.server.timeout_secs,
        )
    }

    /// All node types present in the knowledge graph.
    pub async fn node_types(&self) -> Vec<String> {
        recover("node_types", self.try_static("node_types.json").await)
    }

    /// Edge-type key to metadata map.
    pub async fn edge_types(&self) -> EdgeTypes {
        recover("edge_types", self.try_static("edge_types.json").await)
    }

    /// Node-type -> node-id -> human-readable name.
    pub async fn node_name_dict(&self) -> NodeNameDict {
        recover("node_name_dict", self.try_static("node_name_dict.json").await)
    }

    /// Selectable diseases as `[id, treatable]` pairs.
    pub async fn disease_options(&self) -> Vec<DiseaseOption> {
        recover(
            "disease_options",
            self.try_static("disease_options.json").await,
        )
    }

    /// 2D projection coordinates per drug, for the overview scatter.
    pub async fn drug_embedding(&self) -> EmbeddingMap {
        recover("drug_tsne", self.try_static("drug_tsne.json").await)
    }

    /// Ranked drug predictions for one disease. An empty `disease_id` is
    /// answered locally with an empty list, without touching the network.
    pub async fn drug_predictions(&self, disease_id: &str) -> Vec<DrugPrediction> {
        recover("drug_predictions", self.try_drug_predictions(disease_id).await)
    }

    /// Attention trees for a disease/drug pair, keyed by anchor node.
    pub async fn attention(&self, disease_id: &str, drug_id: &str) -> AttentionMap {
        recover("attention", self.try_attention(disease_id, drug_id).await)
    }

    /// Attention trees plus the explanation paths connecting a disease/drug
    /// pair. Validation of the raw payload happens here, once; callers only
    /// ever see a well-formed (possibly empty) pair.
    pub async fn attention_pair(&self, disease_id: &str, drug_id: &str) -> AttentionPair {
        recover(
            "attention_pair",
            self.try_attention_pair(disease_id, drug_id).await,
        )
    }

    async fn try_static<T: DeserializeOwned>(&self, file: &str) -> Result<T> {
        let url = self.data_base.join(file)?;
        self.get_json(url).await
    }

    async fn try_drug_predictions(&self, disease_id: &str) -> Result<Vec<DrugPrediction>> {
        require_id("disease_id", disease_id)?;
        let url = self.api_url("drug_predictions", &[("disease_id", disease_id)])?;
        self.get_json(url).await
    }

    async fn try_attention(&self, disease_id: &str, drug_id: &str) -> Result<AttentionMap> {
        require_id("disease_id", disease_id)?;
        require_id("drug_id", drug_id)?;
        let url = self.api_url("attention", &[("disease", disease_id), ("drug", drug_id)])?;
        self.get_json(url).await
    }

    async fn try_attention_pair(&self, disease_id: &str, drug_id: &str) -> Result<AttentionPair> {
        require_id("disease_id", disease_id)?;
        require_id("drug_id", drug_id)?;
        let url = self.api_url(
            "attention_pair",
            &[("disease", disease_id), ("drug", drug_id)],
        )?;
        let raw: RawAttentionPair = self.get_json(url).await?;
        raw.validate()
    }

    fn api_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.api_base.join(endpoint)?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        log::debug!("GET {}", url);
        let response = self.http.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_string());
            return Err(DrugPathError::Api(format!("{}: {}", status, body)));
        }

        let value = response.json::<T>().await?;
        log::debug!("GET {} -> {}", url, status);
        Ok(value)
    }
}

fn require_id(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DrugPathError::InvalidInput(format!(
            "{} must not be empty",
            name
        )));
    }
    Ok(())
}

fn recover<T: Default>(what: &str, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            log::warn!("{} request failed, serving empty fallback: {}", what, e);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, "txgnn_data", 5).unwrap()
    }

    /// Bind a stub backend on an ephemeral port and return its base URL.
    async fn spawn_stub(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    #[test]
    fn test_data_url_building() {
        let client = client("http://localhost:8000");
        let url = client.data_base.join("node_types.json").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/txgnn_data/node_types.json"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let with = client("http://localhost:8000/");
        let without = client("http://localhost:8000");
        assert_eq!(with.data_base, without.data_base);
        assert_eq!(with.api_base, without.api_base);
    }

    #[test]
    fn test_api_url_with_query_params() {
        let client = client("http://localhost:8000");
        let url = client
            .api_url("attention_pair", &[("disease", "17494"), ("drug", "DB00915")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/attention_pair?disease=17494&drug=DB00915"
        );
    }

    #[test]
    fn test_nested_base_path_is_preserved() {
        let client = ApiClient::new("http://example.org/explorer", "data", 5).unwrap();
        assert_eq!(
            client.data_base.as_str(),
            "http://example.org/explorer/data/"
        );
        assert_eq!(client.api_base.as_str(), "http://example.org/explorer/api/");
    }

    #[tokio::test]
    async fn test_unreachable_backend_yields_empty_fallbacks() {
        // Port 1 refuses connections, so every request fails at transport level.
        let client = client("http://127.0.0.1:1/");

        assert!(client.node_types().await.is_empty());
        assert!(client.edge_types().await.is_empty());
        assert!(client.node_name_dict().await.is_empty());
        assert!(client.disease_options().await.is_empty());
        assert!(client.drug_embedding().await.is_empty());
        assert!(client.drug_predictions("17494").await.is_empty());
        assert!(client.attention("17494", "DB00915").await.is_empty());

        let pair = client.attention_pair("17494", "DB00915").await;
        assert!(pair.attention.is_empty());
        assert!(pair.paths.is_empty());
    }

    #[tokio::test]
    async fn test_empty_ids_short_circuit_without_a_request() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_handler = hits.clone();
        let app = Router::new().fallback(move || {
            let hits = hits_handler.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Json(serde_json::json!([]))
            }
        });
        let base = spawn_stub(app).await;
        let client = client(&base);

        assert!(client.drug_predictions("").await.is_empty());
        assert!(client.attention("", "DB00915").await.is_empty());
        let pair = client.attention_pair("17494", "  ").await;
        assert!(pair.attention.is_empty());

        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_drug_predictions_parses_served_rows() {
        let app = Router::new().route(
            "/api/drug_predictions",
            get(|| async {
                Json(serde_json::json!([
                    {"score": 0.92, "id": "DB00915", "known": true},
                    {"score": 0.45, "id": "DB01234"}
                ]))
            }),
        );
        let base = spawn_stub(app).await;
        let client = client(&base);

        let predictions = client.drug_predictions("17494").await;

        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].id, "DB00915");
        assert!(predictions[0].known);
        assert!(!predictions[0].selected);
        assert!(!predictions[1].known);
    }

    #[tokio::test]
    async fn test_server_error_status_yields_empty_fallback() {
        let app = Router::new().route(
            "/txgnn_data/disease_options.json",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = spawn_stub(app).await;
        let client = client(&base);

        assert!(client.disease_options().await.is_empty());
    }

    #[tokio::test]
    async fn test_attention_pair_missing_attention_is_rejected_to_fallback() {
        let app = Router::new().route(
            "/api/attention_pair",
            get(|| async { Json(serde_json::json!({ "paths": [] })) }),
        );
        let base = spawn_stub(app).await;
        let client = client(&base);

        let pair = client.attention_pair("17494", "DB00915").await;

        assert!(pair.attention.is_empty());
        assert!(pair.paths.is_empty());
    }

    #[tokio::test]
    async fn test_attention_pair_parses_valid_payload() {
        let app = Router::new().route(
            "/api/attention_pair",
            get(|| async {
                Json(serde_json::json!({
                    "attention": {
                        "17494": {
                            "nodeId": "17494",
                            "nodeType": "disease",
                            "score": 1.0,
                            "children": []
                        }
                    },
                    "paths": [
                        {
                            "nodes": [
                                {"nodeId": "17494", "nodeType": "disease"},
                                {"nodeId": "DB00915", "nodeType": "drug"}
                            ],
                            "edges": [{"edgeInfo": "rev_indication", "score": 0.8}],
                            "avg_score": 0.8
                        }
                    ]
                }))
            }),
        );
        let base = spawn_stub(app).await;
        let client = client(&base);

        let pair = client.attention_pair("17494", "DB00915").await;

        assert_eq!(pair.attention.len(), 1);
        assert_eq!(pair.attention["17494"].node_type, "disease");
        assert_eq!(pair.paths.len(), 1);
        assert!((pair.paths[0].score - 0.8).abs() < 1e-12);
        assert!(!pair.paths[0].synthetic);
    }
}
