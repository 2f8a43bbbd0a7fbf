//! HTTP front end exposing models and datasets to the analysis UI.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::config::ServerOptions;
use crate::data::model::{Dataset, NormalizedRecord, Schema};
use crate::model::Model;

struct ServerState {
    models: BTreeMap<String, Box<dyn Model>>,
    datasets: BTreeMap<String, Box<dyn Dataset>>,
    page_title: String,
}

/// Owns the registered models and datasets until `serve` returns.
pub struct Server {
    state: Arc<ServerState>,
    options: ServerOptions,
}

impl Server {
    pub fn new(
        models: BTreeMap<String, Box<dyn Model>>,
        datasets: BTreeMap<String, Box<dyn Dataset>>,
        options: ServerOptions,
    ) -> Self {
        let state = ServerState {
            models,
            datasets,
            page_title: options.page_title.clone(),
        };
        Self {
            state: Arc::new(state),
            options,
        }
    }

    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.state.models.keys().map(String::as_str)
    }

    pub fn dataset_names(&self) -> impl Iterator<Item = &str> {
        self.state.datasets.keys().map(String::as_str)
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/get_info", get(get_info))
            .route("/get_dataset", get(get_dataset))
            .with_state(self.state.clone())
    }

    /// Bind and serve until the process is stopped.
    pub fn serve(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
        rt.block_on(self.serve_async())
    }

    async fn serve_async(self) -> anyhow::Result<()> {
        let addr = self.options.addr();
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        log::info!("Serving on http://{addr}");
        axum::serve(listener, app).await.context("server error")?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    description: String,
    input_spec: Schema,
    output_spec: Schema,
    /// Registered datasets this model can run on.
    datasets: Vec<String>,
}

#[derive(Debug, Serialize)]
struct DatasetInfo {
    description: String,
    size: usize,
    spec: Schema,
}

#[derive(Debug, Serialize)]
struct InfoResponse {
    page_title: String,
    models: BTreeMap<String, ModelInfo>,
    datasets: BTreeMap<String, DatasetInfo>,
}

async fn get_info(State(state): State<Arc<ServerState>>) -> Json<InfoResponse> {
    let datasets: BTreeMap<String, DatasetInfo> = state
        .datasets
        .iter()
        .map(|(name, ds)| {
            let info = DatasetInfo {
                description: ds.description(),
                size: ds.len(),
                spec: ds.spec(),
            };
            (name.clone(), info)
        })
        .collect();

    let models = state
        .models
        .iter()
        .map(|(name, model)| {
            let compatible = datasets
                .iter()
                .filter(|(_, info)| model.is_compatible_with_dataset(&info.spec))
                .map(|(ds_name, _)| ds_name.clone())
                .collect();
            let info = ModelInfo {
                description: model.description(),
                input_spec: model.input_spec(),
                output_spec: model.output_spec(),
                datasets: compatible,
            };
            (name.clone(), info)
        })
        .collect();

    Json(InfoResponse {
        page_title: state.page_title.clone(),
        models,
        datasets,
    })
}

#[derive(Debug, Deserialize)]
struct DatasetQuery {
    dataset_name: String,
}

async fn get_dataset(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<DatasetQuery>,
) -> Result<Json<Vec<NormalizedRecord>>, (StatusCode, String)> {
    let dataset = state.datasets.get(&query.dataset_name).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            format!("unknown dataset '{}'", query.dataset_name),
        )
    })?;
    Ok(Json(dataset.examples().to_vec()))
}
