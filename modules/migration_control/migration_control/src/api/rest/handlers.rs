//! REST handlers for migration control.
//!
//! Handlers are thin: parse input, call the controller, map errors to Problem.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Query};
use cutover_errors::Problem;
use migration_control_sdk::{
    ControlAction, DeploymentRecord, MigrationTarget, RecordOutcome, TrafficAction,
    TrafficGeneratorStats, WeightRecord,
};

use super::dto::{
    ArbiterResetResponse, ControlRequest, ControlResponse, DeploymentResultRequest,
    DeploymentStartRequest, HealthResponse, SetWeightRequest, StatusDto, StatusQuery,
    TargetQuery, TrafficLockDto, TrafficRequest, TrafficResponse, WeightChangeDto,
};
use super::extract::ApiJson;
use crate::domain::service::MigrationController;

pub type ApiResult<T> = Result<Json<T>, Problem>;

type Svc = Extension<Arc<MigrationController>>;

// === Health ===

/// GET /migration/v1/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

// === Status ===

/// GET /migration/v1/status - aggregated snapshot, degraded rather than failed.
#[tracing::instrument(skip(svc))]
pub async fn get_status(
    Extension(svc): Svc,
    Query(query): Query<StatusQuery>,
) -> ApiResult<StatusDto> {
    let target = query
        .target
        .filter(|t| !t.trim().is_empty())
        .map(MigrationTarget::new);
    let status = svc.get_status(target.as_ref()).await?;
    Ok(Json(StatusDto::from(status)))
}

// === Weight and control ===

/// GET /migration/v1/weight?target=
#[tracing::instrument(skip(svc))]
pub async fn get_weight(
    Extension(svc): Svc,
    Query(query): Query<TargetQuery>,
) -> ApiResult<WeightRecord> {
    let record = svc.get_weight(&MigrationTarget::new(query.target)).await?;
    Ok(Json(record))
}

/// POST /migration/v1/weight
#[tracing::instrument(skip(svc, req), fields(service = %req.target, weight = req.weight))]
pub async fn set_weight(
    Extension(svc): Svc,
    ApiJson(req): ApiJson<SetWeightRequest>,
) -> ApiResult<WeightChangeDto> {
    let change = svc
        .set_weight(&MigrationTarget::new(req.target), req.weight)
        .await?;
    Ok(Json(change.into()))
}

/// POST /migration/v1/control
#[tracing::instrument(skip(svc, req), fields(service = %req.target, action = ?req.action))]
pub async fn control(
    Extension(svc): Svc,
    ApiJson(req): ApiJson<ControlRequest>,
) -> ApiResult<ControlResponse> {
    let target = MigrationTarget::new(req.target);
    let change = match req.action {
        ControlAction::Start => svc.start(&target).await?,
        ControlAction::Stop => svc.stop(&target).await?,
    };
    Ok(Json(change.into()))
}

// === Traffic lock ===

/// GET /migration/v1/traffic-lock - locked whenever the Gateway cannot tell.
#[tracing::instrument(skip(svc))]
pub async fn get_traffic_lock(Extension(svc): Svc) -> Json<TrafficLockDto> {
    let state = svc.get_traffic_lock().await;
    Json(TrafficLockDto {
        locked: state.locked,
    })
}

/// POST /migration/v1/traffic-lock
#[tracing::instrument(skip(svc))]
pub async fn set_traffic_lock(
    Extension(svc): Svc,
    ApiJson(req): ApiJson<TrafficLockDto>,
) -> ApiResult<TrafficLockDto> {
    let state = svc.set_traffic_lock(req.locked).await?;
    Ok(Json(TrafficLockDto {
        locked: state.locked,
    }))
}

// === Synthetic traffic ===

/// POST /migration/v1/traffic
#[tracing::instrument(skip(svc, req), fields(action = ?req.action))]
pub async fn control_traffic(
    Extension(svc): Svc,
    ApiJson(req): ApiJson<TrafficRequest>,
) -> ApiResult<TrafficResponse> {
    match req.action {
        TrafficAction::Start => {
            let target = req.target.map(MigrationTarget::new);
            let url = svc.traffic_url(req.url.as_deref(), target.as_ref())?;
            let stats = svc.start_traffic(&url, req.profile.unwrap_or_default())?;
            Ok(Json(TrafficResponse {
                message: format!("Traffic generation started against {url}"),
                stats,
            }))
        }
        TrafficAction::Stop => Ok(Json(TrafficResponse {
            message: "Traffic generation stopped".to_owned(),
            stats: svc.stop_traffic(),
        })),
    }
}

/// GET /migration/v1/traffic
pub async fn traffic_stats(Extension(svc): Svc) -> Json<TrafficGeneratorStats> {
    Json(svc.traffic_stats())
}

// === Deployment lifecycle ===

/// GET /migration/v1/deployment - `null` until a migration was started.
#[tracing::instrument(skip(svc))]
pub async fn get_deployment(Extension(svc): Svc) -> ApiResult<Option<DeploymentRecord>> {
    Ok(Json(svc.current_deployment().await?))
}

/// POST /migration/v1/deployment/start
#[tracing::instrument(skip(svc, req), fields(migration_id = %req.migration_id))]
pub async fn deployment_start(
    Extension(svc): Svc,
    ApiJson(req): ApiJson<DeploymentStartRequest>,
) -> ApiResult<RecordOutcome> {
    Ok(Json(svc.record_deployment_start(&req.migration_id).await?))
}

/// POST /migration/v1/deployment/result
#[tracing::instrument(skip(svc, req), fields(migration_id = %req.migration_id, status = %req.status))]
pub async fn deployment_result(
    Extension(svc): Svc,
    ApiJson(req): ApiJson<DeploymentResultRequest>,
) -> ApiResult<RecordOutcome> {
    let outcome = svc
        .record_deployment_result(
            &req.migration_id,
            req.legacy,
            req.modern,
            req.status,
            req.message,
        )
        .await?;
    Ok(Json(outcome))
}

// === Arbiter ===

/// POST /migration/v1/arbiter/reset
#[tracing::instrument(skip(svc))]
pub async fn reset_arbiter(Extension(svc): Svc) -> ApiResult<ArbiterResetResponse> {
    svc.reset_arbiter().await?;
    Ok(Json(ArbiterResetResponse {
        success: true,
        message: "Arbiter counters reset".to_owned(),
    }))
}
