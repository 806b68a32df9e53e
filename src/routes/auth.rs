use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::info;

use super::{page, revalidated};
use crate::{
    dto::auth_dto::{LoginForm, SignUpForm},
    error::Result,
    middleware::session::{AnonymousClient, RequestClient},
    services::{
        auth_service::{AuthService, CONFIRM_EMAIL_NOTICE, LOGIN_PATH},
        vacancy_service::{VacancyService, VACANCIES_PATH},
    },
    utils::cookies::{expired_cookie, session_cookie},
    views::{self, Flash},
    AppState,
};

#[axum::debug_handler(state = crate::AppState)]
pub async fn home(RequestClient(backend): RequestClient) -> Result<Response> {
    let viewer = VacancyService::new(backend).current_user().await?;
    Ok(page(StatusCode::OK, views::auth::home_page(viewer.as_ref())))
}

pub async fn signup_form() -> Response {
    page(StatusCode::OK, views::auth::signup_page("", "", None))
}

#[axum::debug_handler(state = crate::AppState)]
pub async fn signup(
    AnonymousClient(backend): AnonymousClient,
    Form(form): Form<SignUpForm>,
) -> Response {
    let (full_name, email) = (form.full_name.clone(), form.email.clone());
    match AuthService::new(backend).sign_up(form).await {
        Ok(ok) => {
            revalidated(&ok);
            let target = ok.redirect.as_deref().unwrap_or(LOGIN_PATH);
            Redirect::to(&format!("{}?registered=1", target)).into_response()
        }
        Err(failure) => page(
            failure.status_code(),
            views::auth::signup_page(&full_name, &email, Some(&Flash::from(&failure))),
        ),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginQuery {
    pub registered: Option<String>,
}

pub async fn login_form(Query(query): Query<LoginQuery>) -> Response {
    let notice = query
        .registered
        .map(|_| Flash::Success(CONFIRM_EMAIL_NOTICE.to_string()));
    page(StatusCode::OK, views::auth::login_page("", notice.as_ref()))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    AnonymousClient(backend): AnonymousClient,
    Form(form): Form<LoginForm>,
) -> Response {
    let email = form.email.clone();
    match AuthService::new(backend).sign_in(form).await {
        Ok(session) => {
            let cookie = session_cookie(
                &state.config.session_cookie,
                &session.access_token,
                session.expires_in,
            );
            (
                [(header::SET_COOKIE, cookie)],
                Redirect::to(VACANCIES_PATH),
            )
                .into_response()
        }
        Err(failure) => page(
            failure.status_code(),
            views::auth::login_page(&email, Some(&Flash::from(&failure))),
        ),
    }
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    RequestClient(backend): RequestClient,
) -> Response {
    // Failures are logged by the service; the cookie is cleared regardless.
    let _ = AuthService::new(backend).sign_out().await;
    info!("Session cookie cleared");
    (
        [(header::SET_COOKIE, expired_cookie(&state.config.session_cookie))],
        Redirect::to(LOGIN_PATH),
    )
        .into_response()
}
