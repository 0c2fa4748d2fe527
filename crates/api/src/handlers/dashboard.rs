use super::models::AppState;
use crate::errors::ApiError;
use crate::models::CheckForm;
use crate::render::{dashboard_page, DashboardPage};
use crate::session::DashboardSession;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};

/// Renders the dashboard, probing the session's target on every load
pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, ApiError> {
    let session = DashboardSession::from_headers(&headers, &state.dashboard);
    let timeout_ms = session.effective_timeout_ms(&state.dashboard);

    let result = state.check(&session.target, timeout_ms).await;

    let html = dashboard_page(&DashboardPage {
        session: &session,
        settings: &state.dashboard,
        result: &result,
        checked_at: chrono::Utc::now(),
    })?;
    Ok(Html(html))
}

/// "Check now": store the submitted fields, then re-render
pub async fn check(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CheckForm>,
) -> Response {
    let mut session = DashboardSession::from_headers(&headers, &state.dashboard);
    session.apply_form(&form, &state.dashboard);
    tracing::debug!(server = %session.target, "dashboard target updated");
    redirect_home(&session)
}

/// Resets host, port and edition to the configured presets
pub async fn reset(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut session = DashboardSession::from_headers(&headers, &state.dashboard);
    session.reset(&state.dashboard);
    redirect_home(&session)
}

fn redirect_home(session: &DashboardSession) -> Response {
    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, "/".to_string()),
            (header::SET_COOKIE, session.cookie()),
        ],
    )
        .into_response()
}
