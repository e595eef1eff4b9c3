use std::sync::Arc;
use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Query, State},
    Json,
};
use crop_core::{Crop, Page, PageRequest, Prediction, PredictionInput};
use crop_storage::{dataset, Notebook, Record};
use crate::error::ApiResult;
use crate::AppState;

pub async fn list_labels() -> Json<[Crop; Crop::COUNT]> {
    Json(Crop::ALL)
}

pub async fn get_data(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PageRequest>, QueryRejection>,
) -> ApiResult<Json<Page<Record>>> {
    let Query(request) = params?;
    let page = dataset::load_page(state.store.as_ref(), request).await?;
    Ok(Json(page))
}

pub async fn get_notebook(State(state): State<Arc<AppState>>) -> ApiResult<Json<Notebook>> {
    let notebook = Notebook::load(state.store.as_ref()).await?;
    Ok(Json(notebook))
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictionInput>, JsonRejection>,
) -> ApiResult<Json<Prediction>> {
    let Json(input) = payload?;
    let prediction = state.prediction.predict(&input).await?;
    Ok(Json(Prediction { prediction }))
}
