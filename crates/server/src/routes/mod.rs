use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, patch, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use doodle_engine::command::fallback::resolve_with_fallback;
use doodle_engine::drawing::{process_drawing, DrawingOptions};
use doodle_engine::extrude::extrude_drawing_hex;
use doodle_engine::geometry::bounding_box;
use doodle_engine::mesh::MeshData;
use doodle_engine::molecule::molecule_catalog;
use doodle_engine::recognize::{estimate_size, recognize_shape};
use shared::{
    ClassifyRequest, ClassifyResponse, CommandRequest, CommandResponse, DrawRequest, DrawResponse,
    ExtrudeRequest, HistoryStepResponse, MoleculeTemplate, ObjectPatch, Object3D, SceneFile,
    SceneSettings,
};

use crate::error::ApiError;
use crate::AppState;

/// Commands returned by `/api/history` when no limit is given.
const DEFAULT_HISTORY_PAGE: usize = 20;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/command", post(command))
        .route("/api/draw", post(draw))
        .route("/api/classify", post(classify))
        .route("/api/scene", get(get_scene).put(put_scene))
        .route("/api/settings", put(put_settings))
        .route("/api/objects/{id}", patch(patch_object).delete(delete_object))
        .route("/api/undo", post(undo))
        .route("/api/redo", post(redo))
        .route("/api/history", get(history))
        .route("/api/molecules", get(molecules))
        .route("/api/extrude", post(extrude))
        .with_state(state)
}

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Text command: local parse, optional fallback, then apply to the scene.
pub async fn command(
    State(state): State<AppState>,
    Json(request): Json<CommandRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let local = state.scene.parse(request.text.clone()).await?;
    let interpretation =
        resolve_with_fallback(&request.text, local, &*state.fallback, state.config.ai_timeout).await;

    let outcome = state.scene.dispatch(interpretation.command.clone()).await?;

    let mut command = interpretation.command;
    if command.error.is_none() {
        command.error = outcome.note;
    }
    let mut objects = outcome.created;
    objects.extend(outcome.updated);

    Ok(Json(CommandResponse {
        command,
        source: interpretation.source,
        objects,
        removed: outcome.removed,
    }))
}

/// Finished stroke → new scene object.
pub async fn draw(
    State(state): State<AppState>,
    Json(request): Json<DrawRequest>,
) -> Result<Json<DrawResponse>, ApiError> {
    let options = DrawingOptions {
        mode: request.mode,
        color: request.color,
        position: request.position.unwrap_or_default(),
    };
    let result = process_drawing(&request.points, &options, doodle_engine::new_object_id());
    state.scene.add_objects(vec![result.object.clone()]).await?;

    Ok(Json(DrawResponse {
        shape: result.shape,
        size: result.size,
        objects: vec![result.object],
    }))
}

/// Classification only; the scene is untouched.
pub async fn classify(Json(request): Json<ClassifyRequest>) -> Json<ClassifyResponse> {
    Json(ClassifyResponse {
        shape: recognize_shape(&request.points),
        size: estimate_size(&request.points),
        bounding_box: bounding_box(&request.points),
    })
}

pub async fn get_scene(State(state): State<AppState>) -> Result<Json<SceneFile>, ApiError> {
    Ok(Json(state.scene.snapshot().await?))
}

pub async fn put_scene(
    State(state): State<AppState>,
    Json(file): Json<SceneFile>,
) -> Result<Json<SceneFile>, ApiError> {
    Ok(Json(state.scene.replace(file).await?))
}

pub async fn put_settings(
    State(state): State<AppState>,
    Json(settings): Json<SceneSettings>,
) -> Result<Json<SceneFile>, ApiError> {
    Ok(Json(state.scene.set_settings(settings).await?))
}

pub async fn patch_object(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ObjectPatch>,
) -> Result<Json<Object3D>, ApiError> {
    Ok(Json(state.scene.update(id, patch).await?))
}

/// Removing an atom removes its bonds too; every removed id is returned.
pub async fn delete_object(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let removed = state.scene.remove(id).await?;
    Ok(Json(json!({ "removed": removed })))
}

pub async fn undo(State(state): State<AppState>) -> Result<Json<HistoryStepResponse>, ApiError> {
    let (applied, scene) = state.scene.undo().await?;
    Ok(Json(HistoryStepResponse { applied, scene }))
}

pub async fn redo(State(state): State<AppState>) -> Result<Json<HistoryStepResponse>, ApiError> {
    let (applied, scene) = state.scene.redo().await?;
    Ok(Json(HistoryStepResponse { applied, scene }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// Recent commands, newest first.
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Value>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_PAGE);
    let commands = state.scene.history(limit).await?;
    Ok(Json(json!({ "commands": commands })))
}

pub async fn molecules() -> Json<&'static [MoleculeTemplate]> {
    Json(molecule_catalog())
}

/// Extruded slab mesh for a drawn path.
pub async fn extrude(Json(request): Json<ExtrudeRequest>) -> Result<Json<MeshData>, ApiError> {
    let color = request.color.as_deref().unwrap_or_default();
    extrude_drawing_hex(&request.points, color)
        .map(Json)
        .ok_or_else(|| ApiError::BadRequest("At least 3 points are required to extrude".into()))
}
