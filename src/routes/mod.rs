pub mod assign_skill;
pub mod auth;
pub mod health;
pub mod manage_skills;
pub mod vacancy;

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use tracing::debug;

use crate::error::{Error, Result};
use crate::services::action::ActionSuccess;
use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/", get(auth::home))
        .route("/signup", get(auth::signup_form).post(auth::signup))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/admin/vacancies", get(vacancy::list_vacancies))
        .route(
            "/admin/vacancies/create",
            get(vacancy::create_form).post(vacancy::create_vacancy),
        )
        .route(
            "/admin/vacancies/:id/toggle-status",
            post(vacancy::toggle_status),
        )
        .route(
            "/admin/vacancies/:id/manage-skills",
            get(manage_skills::manage_skills),
        )
        .route("/admin/vacancies/:id/skills", post(manage_skills::add_skill))
        .route(
            "/admin/vacancies/:id/skills/:skill_id/remove",
            post(manage_skills::remove_skill),
        )
        .route(
            "/admin/assign-skill",
            get(assign_skill::assign_skill_form).post(assign_skill::assign_skill),
        )
        .with_state(state)
}

/// Rendered pages reflect live backend data and are never cached.
pub(crate) fn page(status: StatusCode, html: Html<String>) -> Response {
    (status, [(header::CACHE_CONTROL, "no-store")], html).into_response()
}

pub(crate) fn revalidated(ok: &ActionSuccess) {
    for path in &ok.revalidate {
        debug!(path = %path, "Page data changed");
    }
}

/// Follows an action's redirect with a 303 so the browser issues a GET.
pub(crate) fn after_action(ok: &ActionSuccess) -> Option<Response> {
    revalidated(ok);
    ok.redirect
        .as_deref()
        .map(|location| Redirect::to(location).into_response())
}

pub(crate) fn parse_vacancy_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| Error::BadRequest(format!("Invalid vacancy id '{}'.", raw)))
}
