//! HTTP handlers for the configurator session API.
//!
//! Handlers stay thin: look the session up, lock its slot, call one engine
//! transition, and serialize the outcome. Capacity rejections are ordinary
//! responses with `placed: false`, not HTTP errors; the only error statuses
//! here are unknown sessions, malformed input, and operations that need an
//! envelope before one exists.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::configurator::catalog::{is_catalog_width, AccessoryKind};
use crate::configurator::dimensions::{
    assess_height, assess_width, normalize_dimension, HeightVerdict, WidthVerdict,
};
use crate::configurator::fitting::{classify_palette, PaletteEntry};
use crate::configurator::session::{CompletionReport, DimensionField, WallSnapshot};
use crate::configurator::wall::{PairPlacement, Placement, Removal};
use crate::errors::AppError;
use crate::sessions::SessionSlot;
use crate::state::AppState;

async fn lookup(state: &AppState, id: Uuid) -> Result<Arc<SessionSlot>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
    pub snapshot: WallSnapshot,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<Json<SessionCreatedResponse>, AppError> {
    let slot = state.sessions.create().await;
    let inner = slot.inner.lock().await;
    Ok(Json(SessionCreatedResponse {
        session_id: inner.state.id,
        snapshot: inner.state.snapshot(state.config.accessory_enforcement),
    }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_snapshot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WallSnapshot>, AppError> {
    let slot = lookup(&state, id).await?;
    let mut inner = slot.inner.lock().await;
    inner.touch();
    Ok(Json(inner.state.snapshot(state.config.accessory_enforcement)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}

#[derive(Debug, Deserialize)]
pub struct DimensionsRequest {
    /// Raw width text; absent fields are left as they were.
    pub width: Option<String>,
    pub height: Option<String>,
    pub has_tv: Option<bool>,
    pub has_fire: Option<bool>,
}

/// PUT /api/v1/sessions/:id/dimensions
///
/// Settled input: commits immediately and supersedes any keystroke commit
/// still waiting out its debounce window.
pub async fn handle_commit_dimensions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DimensionsRequest>,
) -> Result<Json<WallSnapshot>, AppError> {
    let slot = lookup(&state, id).await?;
    let mut inner = slot.inner.lock().await;
    inner.touch();

    if let Some(raw) = &request.width {
        inner.width_debounce.cancel();
        inner.state.commit_dimension(DimensionField::Width, raw);
    }
    if let Some(raw) = &request.height {
        inner.height_debounce.cancel();
        inner.state.commit_dimension(DimensionField::Height, raw);
    }
    inner
        .state
        .set_accessory_flags(request.has_tv, request.has_fire);

    Ok(Json(inner.state.snapshot(state.config.accessory_enforcement)))
}

#[derive(Debug, Deserialize)]
pub struct DimensionInputRequest {
    pub field: DimensionField,
    pub raw: String,
}

#[derive(Debug, Serialize)]
pub struct DimensionInputResponse {
    pub field: DimensionField,
    /// Verdict for the field as typed, before the debounced commit lands.
    pub width_verdict: Option<WidthVerdict>,
    pub height_verdict: Option<HeightVerdict>,
    pub commit_pending: bool,
}

/// POST /api/v1/sessions/:id/dimensions/input
///
/// Live typing: answers with an immediate field verdict and arms the
/// debounced commit. Each call restarts the field's quiet window, so only
/// the final keystroke of a burst becomes state.
pub async fn handle_dimension_input(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DimensionInputRequest>,
) -> Result<Json<DimensionInputResponse>, AppError> {
    let slot = lookup(&state, id).await?;
    let mut inner = slot.inner.lock().await;
    inner.touch();

    let normalized = normalize_dimension(&request.raw);
    let (width_verdict, height_verdict) = match request.field {
        DimensionField::Width => (Some(assess_width(normalized)), None),
        DimensionField::Height => (None, Some(assess_height(normalized))),
    };

    let commit_slot = Arc::clone(&slot);
    let field = request.field;
    let raw = request.raw.clone();
    let commit = async move {
        let mut inner = commit_slot.inner.lock().await;
        inner.state.commit_dimension(field, &raw);
    };
    let commit_pending = match request.field {
        DimensionField::Width => {
            inner.width_debounce.schedule(commit);
            inner.width_debounce.is_armed()
        }
        DimensionField::Height => {
            inner.height_debounce.schedule(commit);
            inner.height_debounce.is_armed()
        }
    };

    Ok(Json(DimensionInputResponse {
        field: request.field,
        width_verdict,
        height_verdict,
        commit_pending,
    }))
}

/// POST /api/v1/sessions/:id/dimensions/reset
pub async fn handle_reset_dimensions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WallSnapshot>, AppError> {
    let slot = lookup(&state, id).await?;
    let mut inner = slot.inner.lock().await;
    inner.touch();
    inner.width_debounce.cancel();
    inner.height_debounce.cancel();
    inner.state.reset();
    Ok(Json(inner.state.snapshot(state.config.accessory_enforcement)))
}

#[derive(Debug, Serialize)]
pub struct PaletteResponse {
    pub remaining_mm: i64,
    pub entries: Vec<PaletteEntry>,
}

/// GET /api/v1/sessions/:id/palette
pub async fn handle_get_palette(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaletteResponse>, AppError> {
    let slot = lookup(&state, id).await?;
    let mut inner = slot.inner.lock().await;
    inner.touch();

    let envelope = inner.state.envelope().ok_or_else(|| {
        AppError::UnprocessableEntity("Wall dimensions are not valid yet".to_string())
    })?;
    let remaining_mm = inner.state.composition().remaining_mm(envelope.width_mm);
    Ok(Json(PaletteResponse {
        remaining_mm,
        entries: classify_palette(remaining_mm),
    }))
}

#[derive(Debug, Deserialize)]
pub struct PlaceModuleRequest {
    pub width_mm: u32,
}

#[derive(Debug, Serialize)]
pub struct PlacementResponse {
    pub placed: bool,
    pub outcome: Placement,
    pub snapshot: WallSnapshot,
}

/// POST /api/v1/sessions/:id/modules
pub async fn handle_place_module(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PlaceModuleRequest>,
) -> Result<Json<PlacementResponse>, AppError> {
    if !is_catalog_width(request.width_mm) {
        return Err(AppError::Validation(format!(
            "{} mm is not a catalog module width",
            request.width_mm
        )));
    }

    let slot = lookup(&state, id).await?;
    let mut inner = slot.inner.lock().await;
    inner.touch();

    let outcome = inner.state.add_module(request.width_mm)?;
    if let Placement::Rejected {
        candidate_mm,
        remaining_mm,
    } = &outcome
    {
        warn!(
            "session {id}: rejected {candidate_mm} mm module with {remaining_mm} mm remaining"
        );
    }
    let placed = matches!(outcome, Placement::Placed { .. });
    Ok(Json(PlacementResponse {
        placed,
        outcome,
        snapshot: inner.state.snapshot(state.config.accessory_enforcement),
    }))
}

#[derive(Debug, Deserialize)]
pub struct PlaceAccessoryRequest {
    pub kind: AccessoryKind,
}

#[derive(Debug, Serialize)]
pub struct AccessoryPlacementResponse {
    pub placed: bool,
    pub outcome: PairPlacement,
    pub snapshot: WallSnapshot,
}

/// POST /api/v1/sessions/:id/accessories
pub async fn handle_place_accessory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PlaceAccessoryRequest>,
) -> Result<Json<AccessoryPlacementResponse>, AppError> {
    let slot = lookup(&state, id).await?;
    let mut inner = slot.inner.lock().await;
    inner.touch();

    let outcome = inner.state.add_accessory(request.kind)?;
    if let PairPlacement::Rejected {
        required_mm,
        remaining_mm,
    } = &outcome
    {
        warn!(
            "session {id}: rejected {} pair needing {required_mm} mm, {remaining_mm} mm remaining",
            request.kind
        );
    }
    let placed = matches!(outcome, PairPlacement::Placed { .. });
    Ok(Json(AccessoryPlacementResponse {
        placed,
        outcome,
        snapshot: inner.state.snapshot(state.config.accessory_enforcement),
    }))
}

#[derive(Debug, Serialize)]
pub struct RemovalResponse {
    pub removed: bool,
    pub outcome: Removal,
    pub snapshot: WallSnapshot,
}

/// DELETE /api/v1/sessions/:id/modules/:module_id
///
/// Removing an id that no longer exists is a no-op, not an error: the UI may
/// race its own refresh.
pub async fn handle_remove_module(
    State(state): State<AppState>,
    Path((id, module_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<RemovalResponse>, AppError> {
    let slot = lookup(&state, id).await?;
    let mut inner = slot.inner.lock().await;
    inner.touch();

    let outcome = inner.state.remove_module(module_id);
    let removed = matches!(outcome, Removal::Removed { .. });
    Ok(Json(RemovalResponse {
        removed,
        outcome,
        snapshot: inner.state.snapshot(state.config.accessory_enforcement),
    }))
}

/// DELETE /api/v1/sessions/:id/modules
pub async fn handle_clear_wall(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WallSnapshot>, AppError> {
    let slot = lookup(&state, id).await?;
    let mut inner = slot.inner.lock().await;
    inner.touch();
    inner.state.clear_wall();
    Ok(Json(inner.state.snapshot(state.config.accessory_enforcement)))
}

/// GET /api/v1/sessions/:id/completion
pub async fn handle_get_completion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompletionReport>, AppError> {
    let slot = lookup(&state, id).await?;
    let mut inner = slot.inner.lock().await;
    inner.touch();
    Ok(Json(inner.state.completion(state.config.accessory_enforcement)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::response::IntoResponse;

    use crate::config::Config;
    use crate::configurator::session::AccessoryEnforcement;
    use crate::sessions::SessionStore;

    fn make_state() -> AppState {
        AppState {
            config: Config {
                port: 8080,
                rust_log: "info".to_string(),
                input_debounce_ms: 250,
                session_idle_timeout_minutes: 30,
                session_sweep_interval_seconds: 60,
                accessory_enforcement: AccessoryEnforcement::Advisory,
            },
            sessions: SessionStore::new(Duration::from_millis(250)),
        }
    }

    #[tokio::test]
    async fn test_unknown_session_maps_to_the_not_found_envelope() {
        let state = make_state();
        let result = handle_get_snapshot(State(state), Path(Uuid::new_v4())).await;
        let error = match result {
            Err(error) => error,
            Ok(_) => panic!("an unknown session must not yield a snapshot"),
        };
        assert!(matches!(error, AppError::NotFound(_)));

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("error body must be readable");
        let value: serde_json::Value =
            serde_json::from_slice(&body).expect("error body must be JSON");
        assert_eq!(value["error"]["code"], "NOT_FOUND");
    }
}
