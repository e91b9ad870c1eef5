use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::scope::{ScopeStore, ViewScope};
use super::service::{BoardService, BoardServiceError, MoveOutcome};
use crate::ats::{RecruitStore, StoreError};
use crate::pipeline::{
    CandidateFilter, CandidateId, InvalidTransition, JobId, LifecycleScope, NewJobPosting, Stage,
    StatusOverlap,
};

type SharedService<S, P> = State<Arc<BoardService<S, P>>>;

/// Router exposing the dashboard's job, candidate and board endpoints.
pub fn board_router<S, P>(service: Arc<BoardService<S, P>>) -> Router
where
    S: RecruitStore + 'static,
    P: ScopeStore + 'static,
{
    Router::new()
        .route("/api/v1/stages", get(stages_handler::<S, P>))
        .route(
            "/api/v1/scope",
            get(scope_handler::<S, P>).put(update_scope_handler::<S, P>),
        )
        .route("/api/v1/companies", get(companies_handler::<S, P>))
        .route(
            "/api/v1/jobs",
            get(jobs_handler::<S, P>).post(create_job_handler::<S, P>),
        )
        .route("/api/v1/jobs/:job_id", get(job_handler::<S, P>))
        .route(
            "/api/v1/jobs/:job_id/archive",
            patch(archive_job_handler::<S, P>),
        )
        .route(
            "/api/v1/jobs/:job_id/candidates",
            get(candidates_handler::<S, P>),
        )
        .route(
            "/api/v1/jobs/:job_id/candidates/:candidate_id",
            get(candidate_handler::<S, P>),
        )
        .route(
            "/api/v1/jobs/:job_id/candidates/:candidate_id/status",
            patch(update_status_handler::<S, P>),
        )
        .route("/api/v1/jobs/:job_id/board", get(board_handler::<S, P>))
        .route(
            "/api/v1/jobs/:job_id/board/moves",
            post(move_handler::<S, P>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct JobsQuery {
    #[serde(default)]
    lifecycle: Option<LifecycleScope>,
}

/// Candidate list query string: `statuses` is comma separated and `stage`
/// expands to every status the stage groups.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CandidateQuery {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    statuses: Option<String>,
    #[serde(default)]
    stage: Option<String>,
}

impl CandidateQuery {
    fn into_filter<S, P>(
        self,
        service: &BoardService<S, P>,
    ) -> Result<CandidateFilter, InvalidTransition>
    where
        S: RecruitStore + 'static,
        P: ScopeStore + 'static,
    {
        let mut filter = CandidateFilter::default();
        if let Some(query) = self.query {
            filter = filter.with_query(query);
        }
        if let Some(statuses) = self.statuses {
            filter = filter.with_statuses(
                statuses
                    .split(',')
                    .map(str::trim)
                    .filter(|status| !status.is_empty()),
            );
        }
        if let Some(stage) = self.stage.filter(|stage| !stage.trim().is_empty()) {
            let stage = service.catalog().resolve(&stage)?.id;
            filter = filter.with_stage(service.catalog(), stage);
        }
        Ok(filter)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    pub candidate_id: CandidateId,
    pub stage: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Serialize)]
struct StagesView<'a> {
    stages: &'a [Stage],
    overlaps: Vec<StatusOverlap>,
}

fn error_response(status: StatusCode, message: impl ToString) -> Response {
    let payload = json!({ "error": message.to_string() });
    (status, Json(payload)).into_response()
}

fn service_error_response(error: BoardServiceError) -> Response {
    let status = match &error {
        BoardServiceError::Store(StoreError::JobNotFound(_))
        | BoardServiceError::Store(StoreError::CandidateNotFound { .. }) => StatusCode::NOT_FOUND,
        BoardServiceError::Store(StoreError::Rejected(_)) | BoardServiceError::Superseded(_) => {
            StatusCode::CONFLICT
        }
        BoardServiceError::Store(StoreError::Unavailable(_)) => StatusCode::BAD_GATEWAY,
        BoardServiceError::Transition(_)
        | BoardServiceError::Draft(_)
        | BoardServiceError::BlankStatus => StatusCode::UNPROCESSABLE_ENTITY,
        BoardServiceError::Scope(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, error)
}

pub(crate) async fn stages_handler<S, P>(State(service): SharedService<S, P>) -> Response
where
    S: RecruitStore + 'static,
    P: ScopeStore + 'static,
{
    let catalog = service.catalog();
    let view = StagesView {
        stages: catalog.stages(),
        overlaps: catalog.overlaps(),
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn scope_handler<S, P>(State(service): SharedService<S, P>) -> Response
where
    S: RecruitStore + 'static,
    P: ScopeStore + 'static,
{
    match service.scope() {
        Ok(scope) => (StatusCode::OK, Json(scope)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn update_scope_handler<S, P>(
    State(service): SharedService<S, P>,
    Json(scope): Json<ViewScope>,
) -> Response
where
    S: RecruitStore + 'static,
    P: ScopeStore + 'static,
{
    match service.set_scope(scope) {
        Ok(scope) => (StatusCode::OK, Json(scope)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn companies_handler<S, P>(State(service): SharedService<S, P>) -> Response
where
    S: RecruitStore + 'static,
    P: ScopeStore + 'static,
{
    match service.companies() {
        Ok(companies) => (StatusCode::OK, Json(companies)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn jobs_handler<S, P>(
    State(service): SharedService<S, P>,
    Query(query): Query<JobsQuery>,
) -> Response
where
    S: RecruitStore + 'static,
    P: ScopeStore + 'static,
{
    match service.jobs(query.lifecycle.unwrap_or_default()) {
        Ok(jobs) => (StatusCode::OK, Json(jobs)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn create_job_handler<S, P>(
    State(service): SharedService<S, P>,
    Json(draft): Json<NewJobPosting>,
) -> Response
where
    S: RecruitStore + 'static,
    P: ScopeStore + 'static,
{
    match service.create_job(draft) {
        Ok(job_id) => (StatusCode::CREATED, Json(json!({ "id": job_id }))).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn job_handler<S, P>(
    State(service): SharedService<S, P>,
    Path(job_id): Path<String>,
) -> Response
where
    S: RecruitStore + 'static,
    P: ScopeStore + 'static,
{
    match service.job(&JobId(job_id)) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn archive_job_handler<S, P>(
    State(service): SharedService<S, P>,
    Path(job_id): Path<String>,
) -> Response
where
    S: RecruitStore + 'static,
    P: ScopeStore + 'static,
{
    let job_id = JobId(job_id);
    match service.archive_job(&job_id) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "id": job_id, "archived": true })),
        )
            .into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn candidates_handler<S, P>(
    State(service): SharedService<S, P>,
    Path(job_id): Path<String>,
    Query(query): Query<CandidateQuery>,
) -> Response
where
    S: RecruitStore + 'static,
    P: ScopeStore + 'static,
{
    let filter = match query.into_filter(&service) {
        Ok(filter) => filter,
        Err(error) => return error_response(StatusCode::UNPROCESSABLE_ENTITY, error),
    };
    match service.candidates(&JobId(job_id), &filter) {
        Ok(candidates) => (StatusCode::OK, Json(candidates)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn candidate_handler<S, P>(
    State(service): SharedService<S, P>,
    Path((job_id, candidate_id)): Path<(String, String)>,
) -> Response
where
    S: RecruitStore + 'static,
    P: ScopeStore + 'static,
{
    match service.candidate(&JobId(job_id), &CandidateId(candidate_id)) {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn update_status_handler<S, P>(
    State(service): SharedService<S, P>,
    Path((job_id, candidate_id)): Path<(String, String)>,
    Json(request): Json<StatusUpdateRequest>,
) -> Response
where
    S: RecruitStore + 'static,
    P: ScopeStore + 'static,
{
    let job_id = JobId(job_id);
    let candidate_id = CandidateId(candidate_id);
    match service.update_status(&job_id, &candidate_id, &request.status) {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn board_handler<S, P>(
    State(service): SharedService<S, P>,
    Path(job_id): Path<String>,
    Query(query): Query<CandidateQuery>,
) -> Response
where
    S: RecruitStore + 'static,
    P: ScopeStore + 'static,
{
    let filter = match query.into_filter(&service) {
        Ok(filter) => filter,
        Err(error) => return error_response(StatusCode::UNPROCESSABLE_ENTITY, error),
    };
    match service.board(&JobId(job_id), &filter) {
        Ok(board) => (StatusCode::OK, Json(board)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn move_handler<S, P>(
    State(service): SharedService<S, P>,
    Path(job_id): Path<String>,
    Query(query): Query<CandidateQuery>,
    Json(request): Json<MoveRequest>,
) -> Response
where
    S: RecruitStore + 'static,
    P: ScopeStore + 'static,
{
    let filter = match query.into_filter(&service) {
        Ok(filter) => filter,
        Err(error) => return error_response(StatusCode::UNPROCESSABLE_ENTITY, error),
    };
    let job_id = JobId(job_id);
    match service.move_candidate(&job_id, &request.candidate_id, &request.stage, &filter) {
        Ok(outcome @ MoveOutcome::Applied { .. }) => (StatusCode::OK, Json(outcome)).into_response(),
        Ok(outcome @ MoveOutcome::Superseded { .. }) => {
            (StatusCode::ACCEPTED, Json(outcome)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}
