use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    entity::{Employee, EmployeeRepository},
    error::QueryError,
    storage::EntityStore,
};

use super::{
    models::{CountParams, ErrorResponse, HealthResponse, ParamsError},
    AppState,
};

pub async fn health<S: Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            uptime_secs,
        }),
    )
}

pub async fn count_employees<S: EntityStore<Employee> + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<CountParams>,
) -> Response {
    let (field, filter) = match params.parse() {
        Ok(parsed) => parsed,
        Err(ParamsError::Query(err)) => return query_error_response(&err),
        Err(ParamsError::Invalid(message)) => {
            log::warn!("Rejected count request: {}", message);
            return error_response(StatusCode::BAD_REQUEST, message);
        }
    };

    let repo = EmployeeRepository::new(state.storage.clone());
    let predicate = filter.to_predicate();
    let joined =
        tokio::task::spawn_blocking(move || field.count_report(&repo, &predicate)).await;

    match joined {
        Ok(Ok(report)) => Json(report).into_response(),
        Ok(Err(err)) => query_error_response(&err),
        Err(err) => {
            log::error!("Count task failed: {}", err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
        }
    }
}

pub async fn not_found() -> impl IntoResponse {
    error_response(StatusCode::NOT_FOUND, "endpoint not found".to_string())
}

fn status_for(err: &QueryError) -> StatusCode {
    match err {
        QueryError::InvalidSelector { .. } => StatusCode::BAD_REQUEST,
        QueryError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        QueryError::TypeCoercion(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn query_error_response(err: &QueryError) -> Response {
    let status = status_for(err);
    if status.is_server_error() {
        log::error!("Count query failed: {}", err);
    } else {
        log::warn!("Rejected count request: {}", err);
    }
    error_response(status, err.to_string())
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { message })).into_response()
}
