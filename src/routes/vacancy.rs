use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::Response,
    Form,
};

use super::{after_action, page, parse_vacancy_id};
use crate::{
    dto::vacancy_dto::{CreateVacancyForm, VacancyListQuery},
    error::Result,
    middleware::session::RequestClient,
    services::vacancy_service::VacancyService,
    views::{self, Flash},
};

#[axum::debug_handler(state = crate::AppState)]
pub async fn list_vacancies(
    RequestClient(backend): RequestClient,
    Query(query): Query<VacancyListQuery>,
) -> Result<Response> {
    let list = VacancyService::new(backend).list_for_viewer(&query).await?;
    Ok(page(
        StatusCode::OK,
        views::vacancies::list_page(&list, &query, None),
    ))
}

pub async fn create_form() -> Response {
    page(
        StatusCode::OK,
        views::vacancies::create_page(&CreateVacancyForm::default(), None),
    )
}

#[axum::debug_handler(state = crate::AppState)]
pub async fn create_vacancy(
    RequestClient(backend): RequestClient,
    Form(form): Form<CreateVacancyForm>,
) -> Response {
    match VacancyService::new(backend).create(form.clone()).await {
        Ok(ok) => after_action(&ok).unwrap_or_else(|| {
            page(
                StatusCode::OK,
                views::vacancies::create_page(&CreateVacancyForm::default(), Some(&Flash::from(&ok))),
            )
        }),
        Err(failure) => page(
            failure.status_code(),
            views::vacancies::create_page(&form, Some(&Flash::from(&failure))),
        ),
    }
}

/// Re-renders the default list with the outcome of the toggle.
#[axum::debug_handler(state = crate::AppState)]
pub async fn toggle_status(
    RequestClient(backend): RequestClient,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = parse_vacancy_id(&id)?;
    let service = VacancyService::new(backend);

    let (status, flash) = match service.toggle_status(id).await {
        Ok(ok) => {
            if let Some(response) = after_action(&ok) {
                return Ok(response);
            }
            (StatusCode::OK, Flash::from(&ok))
        }
        Err(failure) => (failure.status_code(), Flash::from(&failure)),
    };

    let query = VacancyListQuery::default();
    let list = service.list_for_viewer(&query).await?;
    Ok(page(
        status,
        views::vacancies::list_page(&list, &query, Some(&flash)),
    ))
}
