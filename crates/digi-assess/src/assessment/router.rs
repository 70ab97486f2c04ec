use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{AssessmentId, CompanyInfo, DimensionId, OptionId, PillarId, QuestionId};
use super::repository::AssessmentRepository;
use super::service::{AssessmentService, AssessmentServiceError, ErrorClass, QuestionFilter};

/// Payload accepted by the start endpoint; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartRequest {
    #[serde(default, alias = "companyName")]
    pub company_name: Option<String>,
    #[serde(default, alias = "companySize")]
    pub company_size: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
}

impl From<StartRequest> for CompanyInfo {
    fn from(request: StartRequest) -> Self {
        CompanyInfo {
            name: request.company_name,
            size: request.company_size,
            sector: request.sector,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerRequest {
    #[serde(alias = "questionId")]
    pub question_id: QuestionId,
    #[serde(alias = "answerId")]
    pub answer_id: OptionId,
}

/// Query string of the question catalog listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionQuery {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub dimension: Option<String>,
    #[serde(default)]
    pub pillar: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub branching: Option<bool>,
}

impl From<QuestionQuery> for QuestionFilter {
    fn from(query: QuestionQuery) -> Self {
        QuestionFilter {
            kind: query.kind,
            dimension: query.dimension.map(DimensionId),
            pillar: query.pillar.map(PillarId),
            search: query.search,
            branching: query.branching.unwrap_or(false),
        }
    }
}

/// Router builder exposing the assessment, results and catalog endpoints.
pub fn assessment_router<R>(service: Arc<AssessmentService<R>>) -> Router
where
    R: AssessmentRepository + 'static,
{
    Router::new()
        .route("/api/v1/assessments", get(list_handler::<R>))
        .route("/api/v1/assessments/start", post(start_handler::<R>))
        .route(
            "/api/v1/assessments/:assessment_id",
            get(get_handler::<R>).delete(delete_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/answer",
            post(answer_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/progress",
            get(progress_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/resume",
            get(resume_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/abandon",
            post(abandon_handler::<R>),
        )
        .route("/api/v1/results/:assessment_id", get(results_handler::<R>))
        .route(
            "/api/v1/results/:assessment_id/summary",
            get(summary_handler::<R>),
        )
        .route(
            "/api/v1/results/:assessment_id/dimension/:dimension_id",
            get(dimension_handler::<R>),
        )
        .route(
            "/api/v1/results/:assessment_id/recalculate",
            post(recalculate_handler::<R>),
        )
        .route("/api/v1/catalog/dimensions", get(dimensions_handler::<R>))
        .route("/api/v1/catalog/questions", get(questions_handler::<R>))
        .route(
            "/api/v1/catalog/questions/stats",
            get(question_stats_handler::<R>),
        )
        .route(
            "/api/v1/catalog/questions/:question_id",
            get(question_handler::<R>),
        )
        .with_state(service)
}

type ServiceState<R> = State<Arc<AssessmentService<R>>>;

fn error_response(error: AssessmentServiceError) -> Response {
    let status = match error.class() {
        ErrorClass::NotFound => StatusCode::NOT_FOUND,
        ErrorClass::BadRequest => StatusCode::BAD_REQUEST,
        ErrorClass::Conflict => StatusCode::CONFLICT,
        ErrorClass::Internal => {
            error!(error = %error, "assessment request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    failure_response(status, error.to_string())
}

fn failure_response(status: StatusCode, message: String) -> Response {
    let payload = json!({
        "success": false,
        "error": message,
    });
    (status, axum::Json(payload)).into_response()
}

fn data_response<T: serde::Serialize>(status: StatusCode, data: T) -> Response {
    let payload = json!({
        "success": true,
        "data": data,
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn start_handler<R>(
    State(service): ServiceState<R>,
    body: Option<axum::Json<StartRequest>>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let request = body.map(|axum::Json(request)| request).unwrap_or_default();
    match service.start(request.into()) {
        Ok(started) => data_response(StatusCode::CREATED, started),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn answer_handler<R>(
    State(service): ServiceState<R>,
    Path(assessment_id): Path<String>,
    body: Result<axum::Json<AnswerRequest>, JsonRejection>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let request = match body {
        Ok(axum::Json(request)) => request,
        Err(rejection) => return failure_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    let id = AssessmentId(assessment_id);
    match service.submit_answer(&id, &request.question_id, &request.answer_id) {
        Ok(outcome) => data_response(StatusCode::OK, outcome),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): ServiceState<R>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.get(&AssessmentId(assessment_id)) {
        Ok(view) => data_response(StatusCode::OK, view),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(State(service): ServiceState<R>) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.list() {
        Ok(listings) => data_response(StatusCode::OK, listings),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn progress_handler<R>(
    State(service): ServiceState<R>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.progress(&AssessmentId(assessment_id)) {
        Ok(progress) => data_response(StatusCode::OK, progress),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn resume_handler<R>(
    State(service): ServiceState<R>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.resume(&AssessmentId(assessment_id)) {
        Ok(view) => data_response(StatusCode::OK, view),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn abandon_handler<R>(
    State(service): ServiceState<R>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.abandon(&AssessmentId(assessment_id)) {
        Ok(assessment) => data_response(
            StatusCode::OK,
            json!({ "assessment_id": assessment.id, "status": assessment.status }),
        ),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): ServiceState<R>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.delete(&id) {
        Ok(()) => data_response(StatusCode::OK, json!({ "deleted": id })),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn results_handler<R>(
    State(service): ServiceState<R>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.results(&AssessmentId(assessment_id)) {
        Ok(result) => data_response(StatusCode::OK, result),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn summary_handler<R>(
    State(service): ServiceState<R>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.summary(&AssessmentId(assessment_id)) {
        Ok(summary) => data_response(StatusCode::OK, summary),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dimension_handler<R>(
    State(service): ServiceState<R>,
    Path((assessment_id, dimension_id)): Path<(String, String)>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.dimension_detail(&AssessmentId(assessment_id), &DimensionId(dimension_id)) {
        Ok(detail) => data_response(StatusCode::OK, detail),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn recalculate_handler<R>(
    State(service): ServiceState<R>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.recalculate(&AssessmentId(assessment_id)) {
        Ok(result) => data_response(StatusCode::OK, result),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dimensions_handler<R>(State(service): ServiceState<R>) -> Response
where
    R: AssessmentRepository + 'static,
{
    let catalog = service.dimensions();
    data_response(
        StatusCode::OK,
        json!({
            "dimensions": catalog.dimensions(),
            "maturity_profiles": catalog.maturity_profiles(),
        }),
    )
}

pub(crate) async fn questions_handler<R>(
    State(service): ServiceState<R>,
    query: Result<Query<QuestionQuery>, QueryRejection>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let filter = match query {
        Ok(Query(query)) => QuestionFilter::from(query),
        Err(rejection) => return failure_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    match service.questions(&filter) {
        Ok(listing) => data_response(StatusCode::OK, listing),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn question_handler<R>(
    State(service): ServiceState<R>,
    Path(question_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.question(&QuestionId(question_id)) {
        Ok(question) => data_response(StatusCode::OK, question),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn question_stats_handler<R>(State(service): ServiceState<R>) -> Response
where
    R: AssessmentRepository + 'static,
{
    data_response(StatusCode::OK, service.question_stats())
}
