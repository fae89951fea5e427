use crate::errors::AppError;
use crate::models::{
    DayView, EntryResponse, HealthResponse, LogsResponse, SessionEventRequest, SessionResponse,
    UpsertResponse, WeightsResponse,
};
use crate::plan::{plan, Plan};
use crate::session::TrackerSession;
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use chrono::{Local, NaiveDate};
use serde_json::{Map, Value};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.config.base_path, Local::now().date_naive()))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

pub async fn list_logs(State(state): State<AppState>) -> Result<Json<LogsResponse>, AppError> {
    let logs = state.logs.list_all().await?;
    Ok(Json(LogsResponse { logs }))
}

pub async fn get_log(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<EntryResponse>, AppError> {
    let date = parse_date(&date)?;
    let entry = state.logs.get_by_date(date).await?;
    Ok(Json(EntryResponse { entry }))
}

pub async fn put_log(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(payload): Json<Map<String, Value>>,
) -> Result<Json<UpsertResponse>, AppError> {
    let date = parse_date(&date)?;
    let entry = state.logs.upsert(date, payload).await?;
    Ok(Json(UpsertResponse { ok: true, entry }))
}

pub async fn get_weights(State(state): State<AppState>) -> Result<Json<WeightsResponse>, AppError> {
    let weights = state.logs.list_weights().await?;
    Ok(Json(WeightsResponse { weights }))
}

pub async fn get_plan() -> Json<&'static Plan> {
    Json(plan())
}

pub async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DayView>, AppError> {
    let date = parse_date(&date)?;
    Ok(Json(state.logs.day_view(date).await?))
}

/// A fresh tracker session for today, with the requests the page should make.
pub async fn start_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let (session, commands) =
        TrackerSession::start(Local::now().date_naive(), state.config.reconcile_policy);
    Json(SessionResponse::new(session, commands))
}

/// Applies one event to the session the page holds.
pub async fn session_event(
    State(state): State<AppState>,
    Json(request): Json<SessionEventRequest>,
) -> Json<SessionResponse> {
    let mut session = request.session.with_policy(state.config.reconcile_policy);
    let commands = session.handle(request.event);
    Json(SessionResponse::new(session, commands))
}

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::bad_request(format!("'{value}' is not a YYYY-MM-DD date")))
}
