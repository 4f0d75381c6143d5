use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::repository::{SessionId, SessionStore, SessionStoreError};
use super::service::{SessionServiceError, WizardSessionService};
use crate::wizard::domain::Country;
use crate::wizard::mock::MockError;
use crate::wizard::state::{ControllerError, WizardIntent};
use crate::wizard::submission::DownloadError;

/// Router builder exposing the wizard session endpoints.
pub fn wizard_router<S>(service: Arc<WizardSessionService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/wizard/catalogue", get(catalogue_handler::<S>))
        .route("/api/v1/wizard/sessions", post(create_handler::<S>))
        .route(
            "/api/v1/wizard/sessions/:session_id",
            get(snapshot_handler::<S>).delete(close_handler::<S>),
        )
        .route(
            "/api/v1/wizard/sessions/:session_id/intents",
            post(intent_handler::<S>),
        )
        .route(
            "/api/v1/wizard/sessions/:session_id/submission",
            post(submission_handler::<S>),
        )
        .route(
            "/api/v1/wizard/sessions/:session_id/payment",
            post(payment_handler::<S>),
        )
        .route(
            "/api/v1/wizard/sessions/:session_id/offers/:slug",
            get(download_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Serialize)]
struct CatalogueCountryView {
    country: Country,
    code: &'static str,
    universities: Vec<CatalogueUniversityView>,
}

#[derive(Debug, Serialize)]
struct CatalogueUniversityView {
    id: &'static str,
    name: &'static str,
    description: &'static str,
}

pub(crate) async fn catalogue_handler<S>(
    State(service): State<Arc<WizardSessionService<S>>>,
) -> Response
where
    S: SessionStore + 'static,
{
    let catalogue = service.catalogue();
    let countries: Vec<CatalogueCountryView> = Country::ordered()
        .into_iter()
        .map(|country| CatalogueCountryView {
            country,
            code: country.code(),
            universities: catalogue
                .universities_for(country)
                .into_iter()
                .map(|entry| CatalogueUniversityView {
                    id: entry.id,
                    name: entry.name,
                    description: entry.description,
                })
                .collect(),
        })
        .collect();

    (StatusCode::OK, axum::Json(countries)).into_response()
}

pub(crate) async fn create_handler<S>(
    State(service): State<Arc<WizardSessionService<S>>>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.create() {
        Ok(snapshot) => (StatusCode::CREATED, axum::Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn snapshot_handler<S>(
    State(service): State<Arc<WizardSessionService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.snapshot(&SessionId(session_id)) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn close_handler<S>(
    State(service): State<Arc<WizardSessionService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.close(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn intent_handler<S>(
    State(service): State<Arc<WizardSessionService<S>>>,
    Path(session_id): Path<String>,
    axum::Json(intent): axum::Json<WizardIntent>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.dispatch(&SessionId(session_id), intent) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submission_handler<S>(
    State(service): State<Arc<WizardSessionService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.start_submission(&SessionId(session_id)) {
        Ok(snapshot) => (StatusCode::ACCEPTED, axum::Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn payment_handler<S>(
    State(service): State<Arc<WizardSessionService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.start_payment(&SessionId(session_id)) {
        Ok(snapshot) => (StatusCode::ACCEPTED, axum::Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn download_handler<S>(
    State(service): State<Arc<WizardSessionService<S>>>,
    Path((session_id, slug)): Path<(String, String)>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.download(&SessionId(session_id), &slug) {
        Ok(download) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, download.content_type),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", download.file_name),
                ),
            ],
            download.body,
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// HTTP status for a wizard service failure, shared by every surface that renders one.
pub(crate) fn status_for(err: &SessionServiceError) -> StatusCode {
    match err {
        SessionServiceError::Store(SessionStoreError::NotFound) => StatusCode::NOT_FOUND,
        SessionServiceError::Store(SessionStoreError::Conflict) => StatusCode::CONFLICT,
        SessionServiceError::Controller(ControllerError::Rejected(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        SessionServiceError::Controller(_) => StatusCode::CONFLICT,
        SessionServiceError::Download(DownloadError::Locked) => StatusCode::PAYMENT_REQUIRED,
        SessionServiceError::Download(DownloadError::UnknownOffer(_)) => StatusCode::NOT_FOUND,
        SessionServiceError::Timer(MockError::AlreadyRunning(_)) => StatusCode::CONFLICT,
        SessionServiceError::Store(SessionStoreError::Unavailable(_))
        | SessionServiceError::Timer(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: SessionServiceError) -> Response {
    let status = status_for(&err);

    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
