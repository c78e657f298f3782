//! # API REST
//!
//! REST API implementation for MDR.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, status codes, CORS)
//!
//! Handlers validate through the core form controller and mutate through the orchestrator, so
//! the projected rows served by `/doctors/rows` always reflect the latest successful write.

#![warn(rust_2018_idioms)]

use api_shared::dto::{
    DeleteDoctorRes, DisplayRowRes, DoctorFormReq, DoctorMutationRes, DoctorRes, DoctorRowsRes,
    HealthRes, ListDoctorsRes, ListReferenceRes, ReferenceItemRes, ValidationErrorRes,
};
use api_shared::HealthService;
use axum::{
    extract::{Path as AxumPath, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, put},
    Router,
};
use mdr_core::{
    CoreConfig, DirectoryError, DirectoryRepository, DoctorRecord, FieldErrors, FormController,
    Orchestrator, Store, Submission,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use utoipa::{IntoParams, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>, orchestrator: Arc<Orchestrator>) -> Self {
        Self { cfg, orchestrator }
    }

    /// Open the configured data layer and load the directory into the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed file cannot be read or parsed, or the initial load task
    /// panics.
    pub async fn bootstrap(cfg: CoreConfig) -> anyhow::Result<Self> {
        let repository = match cfg.seed_file() {
            Some(path) => DirectoryRepository::load(path)?,
            None => {
                tracing::warn!("no seed file configured; starting with an empty directory");
                DirectoryRepository::default()
            }
        };
        let orchestrator = Arc::new(Orchestrator::new(
            Arc::new(repository),
            Arc::new(Store::default()),
        ));
        orchestrator.load_all(CancellationToken::new()).await?;
        Ok(Self::new(Arc::new(cfg), orchestrator))
    }
}

/// Error returned by handlers.
#[derive(Debug)]
pub enum ApiError {
    Validation(FieldErrors),
    Directory(DirectoryError),
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Validation(errors) => ApiError::Validation(errors),
            other => ApiError::Directory(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationErrorRes::from(errors)),
            )
                .into_response(),
            ApiError::Directory(err @ DirectoryError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, err.to_string()).into_response()
            }
            ApiError::Directory(err @ DirectoryError::InvalidInput(_)) => {
                (StatusCode::BAD_REQUEST, err.to_string()).into_response()
            }
            ApiError::Directory(err) => {
                tracing::error!("directory error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RowsQuery {
    /// Case-insensitive text matched against name, contact, email, titles and address.
    pub q: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_doctors,
        doctor_rows,
        create_doctor,
        update_doctor,
        delete_doctor,
        list_specializations,
        list_affiliations,
    ),
    components(schemas(
        HealthRes,
        ReferenceItemRes,
        ListReferenceRes,
        api_shared::dto::ReferenceRefRes,
        api_shared::dto::DoctorProfileRes,
        api_shared::dto::AddressRes,
        DoctorRes,
        ListDoctorsRes,
        DisplayRowRes,
        DoctorRowsRes,
        DoctorFormReq,
        DoctorMutationRes,
        DeleteDoctorRes,
        ValidationErrorRes,
    ))
)]
pub struct ApiDoc;

/// Build the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/doctors", get(list_doctors).post(create_doctor))
        .route("/doctors/rows", get(doctor_rows))
        .route("/doctors/:id", put(update_doctor).delete(delete_doctor))
        .route("/specializations", get(list_specializations))
        .route("/affiliations", get(list_affiliations))
        .merge(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/doctors",
    responses(
        (status = 200, description = "Doctors as stored", body = ListDoctorsRes)
    )
)]
#[axum::debug_handler]
async fn list_doctors(State(state): State<AppState>) -> Json<ListDoctorsRes> {
    let doctors = state.orchestrator.store().snapshot().doctors;
    Json(ListDoctorsRes {
        doctors: doctors.into_iter().map(Into::into).collect(),
    })
}

#[utoipa::path(
    get,
    path = "/doctors/rows",
    params(RowsQuery),
    responses(
        (status = 200, description = "Projected and filtered display rows", body = DoctorRowsRes)
    )
)]
/// Display rows for the doctor table.
///
/// `loading` stays true until doctors and both reference lists are non-empty; rows are empty
/// while loading.
#[axum::debug_handler]
async fn doctor_rows(
    State(state): State<AppState>,
    Query(params): Query<RowsQuery>,
) -> Json<DoctorRowsRes> {
    let query = params.q.unwrap_or_default();
    let view = state
        .orchestrator
        .store()
        .view(&query, state.cfg.date_format());
    Json(view.into())
}

async fn apply(state: &AppState, submission: Submission) -> Result<DoctorRecord, ApiError> {
    let record = match submission {
        Submission::Create(payload) => state.orchestrator.create_doctor(payload).await?,
        Submission::Update { id, payload } => {
            state.orchestrator.update_doctor(id, payload).await?
        }
    };
    Ok(record)
}

#[utoipa::path(
    post,
    path = "/doctors",
    request_body = DoctorFormReq,
    responses(
        (status = 201, description = "Doctor created", body = DoctorMutationRes),
        (status = 404, description = "Unknown specialization or affiliation"),
        (status = 422, description = "Form validation failed", body = ValidationErrorRes),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
async fn create_doctor(
    State(state): State<AppState>,
    Json(req): Json<DoctorFormReq>,
) -> Result<(StatusCode, Json<DoctorMutationRes>), ApiError> {
    let mut form = FormController::with_state(req.into_form(None));
    let submission = form.submit().map_err(ApiError::Validation)?;
    let record = apply(&state, submission).await?;
    Ok((
        StatusCode::CREATED,
        Json(DoctorMutationRes {
            doctor: record.into(),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/doctors/{id}",
    params(("id" = i64, Path, description = "Doctor id")),
    request_body = DoctorFormReq,
    responses(
        (status = 200, description = "Doctor updated", body = DoctorMutationRes),
        (status = 404, description = "Doctor or reference not found"),
        (status = 422, description = "Form validation failed", body = ValidationErrorRes),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
async fn update_doctor(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<i64>,
    Json(req): Json<DoctorFormReq>,
) -> Result<Json<DoctorMutationRes>, ApiError> {
    let mut form = FormController::with_state(req.into_form(Some(id)));
    let submission = form.submit().map_err(ApiError::Validation)?;
    let record = apply(&state, submission).await?;
    Ok(Json(DoctorMutationRes {
        doctor: record.into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/doctors/{id}",
    params(("id" = i64, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "Doctor deleted", body = DeleteDoctorRes),
        (status = 404, description = "Doctor not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Delete a doctor. The HTTP request is itself the confirmation step.
#[axum::debug_handler]
async fn delete_doctor(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<i64>,
) -> Result<Json<DeleteDoctorRes>, ApiError> {
    state.orchestrator.delete_doctor(id).await?;
    Ok(Json(DeleteDoctorRes { success: true }))
}

#[utoipa::path(
    get,
    path = "/specializations",
    responses(
        (status = 200, description = "Specialization reference list", body = ListReferenceRes)
    )
)]
#[axum::debug_handler]
async fn list_specializations(State(state): State<AppState>) -> Json<ListReferenceRes> {
    Json(state.orchestrator.store().snapshot().specializations.into())
}

#[utoipa::path(
    get,
    path = "/affiliations",
    responses(
        (status = 200, description = "Affiliation reference list", body = ListReferenceRes)
    )
)]
#[axum::debug_handler]
async fn list_affiliations(State(state): State<AppState>) -> Json<ListReferenceRes> {
    Json(state.orchestrator.store().snapshot().affiliations.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use mdr_core::{
        Address, DirectorySeed, DoctorProfile, DoctorRecord, ReferenceItem, ReferenceRef,
    };
    use tower::ServiceExt;

    fn seed() -> DirectorySeed {
        DirectorySeed {
            specializations: vec![
                ReferenceItem::new(1, "Cardiology"),
                ReferenceItem::new(2, "Dermatology"),
            ],
            affiliations: vec![ReferenceItem::new(10, "Al Noor Hospital")],
            doctors: vec![DoctorRecord {
                id: 1,
                name_english: "Layla Haddad".into(),
                name_arabic: None,
                contact: "+971 50 111 2222".into(),
                email: "layla@clinic.example".into(),
                created_at: "2024-01-15T08:00:00Z".into(),
                doctor: DoctorProfile {
                    specialization: Some(ReferenceRef { id: 1 }),
                    affiliation: Some(ReferenceRef { id: 10 }),
                },
                address: Some(Address {
                    line1: "7 Palm St".into(),
                    line2: None,
                    city: Some("Abu Dhabi".into()),
                    state: None,
                    country: Some("UAE".into()),
                    zip_code: None,
                }),
            }],
        }
    }

    async fn app() -> Router {
        let orchestrator = Arc::new(Orchestrator::new(
            Arc::new(DirectoryRepository::from_seed(seed())),
            Arc::new(Store::default()),
        ));
        orchestrator
            .load_all(CancellationToken::new())
            .await
            .unwrap();
        router(AppState::new(Arc::new(CoreConfig::default()), orchestrator))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn valid_form() -> serde_json::Value {
        serde_json::json!({
            "name_english": "Karim Nasser",
            "contact": "050 987 6543",
            "email": "karim@clinic.example",
            "specialization_id": "2",
            "affiliation_id": "10",
            "address_line1": "21 Corniche Rd",
            "city": "Dubai"
        })
    }

    #[tokio::test]
    async fn rows_are_projected_and_filtered() {
        let app = app().await;

        let (status, body) = send(&app, "GET", "/doctors/rows", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["loading"], false);
        assert_eq!(body["rows"][0]["specialization_title"], "Cardiology");
        assert_eq!(body["rows"][0]["address"], "7 Palm St, Abu Dhabi, UAE");
        assert_eq!(body["rows"][0]["created_at"], "15/01/2024");

        let (_, body) = send(&app, "GET", "/doctors/rows?q=nothing-matches", None).await;
        assert_eq!(body["rows"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn create_validates_then_shows_up_in_rows() {
        let app = app().await;

        let (status, body) = send(
            &app,
            "POST",
            "/doctors",
            Some(serde_json::json!({ "contact": "12ab" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"]["name_english"], "Name (English) is required");
        assert_eq!(body["errors"]["contact"], "Contact must be a valid phone number");

        let (status, body) = send(&app, "POST", "/doctors", Some(valid_form())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["doctor"]["id"], 2);

        let (_, body) = send(&app, "GET", "/doctors/rows?q=dermatology", None).await;
        assert_eq!(body["rows"][0]["name_english"], "Karim Nasser");
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_doctors() {
        let app = app().await;

        let (status, _) = send(&app, "PUT", "/doctors/99", Some(valid_form())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, "PUT", "/doctors/1", Some(valid_form())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["doctor"]["created_at"], "2024-01-15T08:00:00Z");

        let (status, body) = send(&app, "DELETE", "/doctors/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, _) = send(&app, "DELETE", "/doctors/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reference_lists_and_health() {
        let app = app().await;

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);

        let (_, body) = send(&app, "GET", "/specializations", None).await;
        assert_eq!(body["items"][1]["title"], "Dermatology");

        let (_, body) = send(&app, "GET", "/affiliations", None).await;
        assert_eq!(body["items"][0]["id"], 10);
    }
}
