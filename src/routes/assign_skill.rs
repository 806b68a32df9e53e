use axum::{http::StatusCode, response::Response, Form};

use super::{page, revalidated};
use crate::{
    dto::skill_dto::AssignSkillForm,
    error::Result,
    middleware::session::RequestClient,
    services::profile_skill_service::ProfileSkillService,
    views::{self, Flash},
};

#[axum::debug_handler(state = crate::AppState)]
pub async fn assign_skill_form(RequestClient(backend): RequestClient) -> Result<Response> {
    let options = ProfileSkillService::new(backend).options().await?;
    Ok(page(
        StatusCode::OK,
        views::skills::assign_skill_page(&options, &AssignSkillForm::default(), None),
    ))
}

#[axum::debug_handler(state = crate::AppState)]
pub async fn assign_skill(
    RequestClient(backend): RequestClient,
    Form(form): Form<AssignSkillForm>,
) -> Result<Response> {
    let service = ProfileSkillService::new(backend);
    let (status, flash, shown) = match service.assign(form.clone()).await {
        Ok(ok) => {
            revalidated(&ok);
            (StatusCode::OK, Flash::from(&ok), AssignSkillForm::default())
        }
        Err(failure) => (failure.status_code(), Flash::from(&failure), form),
    };

    let options = service.options().await?;
    Ok(page(
        status,
        views::skills::assign_skill_page(&options, &shown, Some(&flash)),
    ))
}
