use axum::{extract::Path, http::StatusCode, response::Response, Form};

use super::{page, parse_vacancy_id, revalidated};
use crate::{
    dto::vacancy_dto::{AddVacancySkillForm, RemoveVacancySkillInput},
    error::{Error, Result},
    middleware::session::RequestClient,
    services::{action::ActionResult, vacancy_skill_service::VacancySkillService},
    views::{self, Flash},
};

async fn render(
    service: &VacancySkillService,
    vacancy_id: i64,
    status: StatusCode,
    flash: Option<&Flash>,
) -> Result<Response> {
    let data = service
        .manage_data(vacancy_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Vacancy {} not found.", vacancy_id)))?;
    Ok(page(status, views::skills::manage_skills_page(&data, flash)))
}

async fn render_outcome(
    service: &VacancySkillService,
    vacancy_id: i64,
    result: ActionResult,
) -> Result<Response> {
    match result {
        Ok(ok) => {
            revalidated(&ok);
            render(service, vacancy_id, StatusCode::OK, Some(&Flash::from(&ok))).await
        }
        Err(failure) => {
            render(
                service,
                vacancy_id,
                failure.status_code(),
                Some(&Flash::from(&failure)),
            )
            .await
        }
    }
}

#[axum::debug_handler(state = crate::AppState)]
pub async fn manage_skills(
    RequestClient(backend): RequestClient,
    Path(id): Path<String>,
) -> Result<Response> {
    let vacancy_id = parse_vacancy_id(&id)?;
    render(
        &VacancySkillService::new(backend),
        vacancy_id,
        StatusCode::OK,
        None,
    )
    .await
}

#[axum::debug_handler(state = crate::AppState)]
pub async fn add_skill(
    RequestClient(backend): RequestClient,
    Path(id): Path<String>,
    Form(mut form): Form<AddVacancySkillForm>,
) -> Result<Response> {
    let vacancy_id = parse_vacancy_id(&id)?;
    // The path names the vacancy; a hidden field cannot redirect the write.
    form.vacancy_id = vacancy_id.to_string();

    let service = VacancySkillService::new(backend);
    let result = service.add(form).await;
    render_outcome(&service, vacancy_id, result).await
}

#[axum::debug_handler(state = crate::AppState)]
pub async fn remove_skill(
    RequestClient(backend): RequestClient,
    Path((id, skill_id)): Path<(String, String)>,
) -> Result<Response> {
    let vacancy_id = parse_vacancy_id(&id)?;
    let service = VacancySkillService::new(backend);
    let result = match RemoveVacancySkillInput::parse(&id, &skill_id) {
        Ok(input) => service.remove(input).await,
        Err(failure) => Err(failure),
    };
    render_outcome(&service, vacancy_id, result).await
}
