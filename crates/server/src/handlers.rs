//! Request handlers for the SeaTrack server.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{AppendHeaders, Html, IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use seatrack_common::{Coordinates, NewLocationRecord, ObjectId, Origin};
use seatrack_qr::{issue, png_file_name, render_png};
use seatrack_record_store::RecordStore;

use crate::pages;
use crate::session::{AdminGate, LoginOutcome, SESSION_COOKIE};

/// Shared application state
pub struct AppState {
    /// The record store behind the write path.
    pub store: Arc<dyn RecordStore>,

    /// The admin gate in front of the QR issuance pages.
    pub gate: AdminGate,

    /// Configured origin for issued tracking links, if any.
    pub public_origin: Option<Origin>,
}

impl AppState {
    /// Bundle the collaborators the handlers need.
    pub fn new(store: Arc<dyn RecordStore>, gate: AdminGate, public_origin: Option<Origin>) -> Self {
        Self {
            store,
            gate,
            public_origin,
        }
    }
}

/// API Error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message
        });

        (self.status, Json(body)).into_response()
    }
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "seatrack-server"
    }))
}

/// Landing page
pub async fn home_handler() -> Html<String> {
    Html(pages::landing())
}

#[derive(Debug, Deserialize)]
pub struct LogLocationPageQuery {
    pub id: Option<String>,
}

/// Submission UI; a missing or blank identifier gets the descriptive error
/// page instead of a form.
pub async fn log_location_page_handler(
    Query(query): Query<LogLocationPageQuery>,
) -> Html<String> {
    match query.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => Html(pages::log_location(id)),
        _ => Html(pages::missing_object_id()),
    }
}

/// Body of the record write path.
#[derive(Debug, Deserialize)]
pub struct LogLocationRequest {
    #[serde(default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub submitting_agent: Option<String>,
}

/// Reply of the record write path.
#[derive(Debug, Serialize)]
pub struct LogLocationResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
}

impl LogLocationResponse {
    fn failure(message: &str) -> Json<Self> {
        Json(Self {
            success: false,
            message: message.to_string(),
            record_id: None,
        })
    }
}

fn validate_report(payload: &LogLocationRequest) -> Option<NewLocationRecord> {
    let object_id = ObjectId::parse(payload.object_id.as_deref()?).ok()?;
    let coordinates = Coordinates::new(payload.latitude?, payload.longitude?).ok()?;
    Some(NewLocationRecord::new(
        object_id,
        coordinates,
        payload.submitting_agent.clone(),
    ))
}

/// Append one location record to the store.
pub async fn log_location_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LogLocationRequest>,
) -> Json<LogLocationResponse> {
    let report = match validate_report(&payload) {
        Some(report) => report,
        None => return LogLocationResponse::failure("Invalid data provided."),
    };

    info!("Recording location for object: {}", report.object_id);

    match state.store.append(report).await {
        Ok(record_id) => Json(LogLocationResponse {
            success: true,
            message: "Location logged successfully.".to_string(),
            record_id: Some(record_id.to_string()),
        }),
        Err(err) => {
            error!("Failed to append location record: {}", err);
            // Raw store errors are not safe for display.
            LogLocationResponse::failure("Failed to log location. Please try again later.")
        }
    }
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// The application's own origin: the configured one when set, otherwise
/// derived from the request's Host header. Deployments behind TLS
/// termination should configure SEATRACK_PUBLIC_ORIGIN.
fn resolve_origin(state: &AppState, headers: &HeaderMap) -> Option<Origin> {
    if let Some(origin) = &state.public_origin {
        return Some(origin.clone());
    }
    let host = headers.get(header::HOST)?.to_str().ok()?;
    Origin::parse(&format!("http://{host}")).ok()
}

fn warn_on_default_secret(gate: &AdminGate) {
    if gate.uses_default_secret() {
        warn!("Admin page rendered with the default admin password; set SEATRACK_ADMIN_PASSWORD");
    }
}

/// Gated QR issuance UI.
pub async fn admin_qr_page_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Html<String> {
    let token = session_token(&headers);
    if !state.gate.is_authenticated(token.as_deref()) {
        return Html(pages::admin_login(None, state.gate.uses_default_secret()));
    }

    warn_on_default_secret(&state.gate);
    Html(pages::admin_generate(
        state.gate.uses_default_secret(),
        None,
        None,
    ))
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginForm {
    #[serde(default)]
    pub password: String,
}

/// Admin gate check.
pub async fn admin_login_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AdminLoginForm>,
) -> Response {
    match state.gate.login(&form.password) {
        LoginOutcome::Authenticated { token } => {
            warn_on_default_secret(&state.gate);
            // The ten-year Max-Age stands in for a flag with no expiry.
            let cookie =
                format!("{SESSION_COOKIE}={token}; Path=/; Max-Age=315360000; SameSite=Lax");
            (
                AppendHeaders([(header::SET_COOKIE, cookie)]),
                Html(pages::admin_generate(
                    state.gate.uses_default_secret(),
                    None,
                    None,
                )),
            )
                .into_response()
        }
        LoginOutcome::Incorrect => Html(pages::admin_login(
            Some("Incorrect password. Please try again."),
            state.gate.uses_default_secret(),
        ))
        .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateQrForm {
    #[serde(default)]
    pub object_id: String,
}

/// Generate a tracking link and render its QR inline.
pub async fn admin_generate_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<GenerateQrForm>,
) -> Html<String> {
    let token = session_token(&headers);
    if !state.gate.is_authenticated(token.as_deref()) {
        return Html(pages::admin_login(None, state.gate.uses_default_secret()));
    }

    warn_on_default_secret(&state.gate);

    let origin = resolve_origin(&state, &headers);
    match issue(origin.as_ref(), &form.object_id) {
        Ok(link) => {
            info!("Issued tracking link for object: {}", link.object_id());
            Html(pages::admin_generate(
                state.gate.uses_default_secret(),
                None,
                Some(&link),
            ))
        }
        Err(err) => Html(pages::admin_generate(
            state.gate.uses_default_secret(),
            Some(&err.to_string()),
            None,
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct QrPngQuery {
    pub id: Option<String>,
}

/// Gated PNG download of a tracking QR code.
pub async fn admin_qr_png_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<QrPngQuery>,
) -> Result<Response, ApiError> {
    let token = session_token(&headers);
    if !state.gate.is_authenticated(token.as_deref()) {
        return Err(ApiError {
            status: StatusCode::UNAUTHORIZED,
            message: "Admin login required.".to_string(),
        });
    }

    let origin = resolve_origin(&state, &headers);
    let link = issue(origin.as_ref(), query.id.as_deref().unwrap_or_default()).map_err(|err| {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
        }
    })?;

    let png = render_png(&link).map_err(|err| {
        error!("Failed to render QR PNG: {}", err);
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Failed to render QR code.".to_string(),
        }
    })?;

    let disposition = format!("attachment; filename=\"{}\"", png_file_name(link.object_id()));
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        png,
    )
        .into_response())
}
