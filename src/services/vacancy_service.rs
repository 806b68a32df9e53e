use std::sync::Arc;

use tracing::{error, info, warn};

use crate::backend::Backend;
use crate::dto::vacancy_dto::{CreateVacancyForm, VacancyListQuery};
use crate::error::Result;
use crate::models::user::SessionUser;
use crate::models::vacancy::{NewVacancy, Vacancy, VacancyFilter, VacancyStatus, VacancyType};
use crate::services::action::{ActionFailure, ActionResult, ActionSuccess};

pub const VACANCIES_PATH: &str = "/admin/vacancies";

pub fn manage_skills_path(vacancy_id: i64) -> String {
    format!("{}/{}/manage-skills", VACANCIES_PATH, vacancy_id)
}

#[derive(Clone)]
pub struct VacancyService {
    backend: Arc<dyn Backend>,
}

pub struct VacancyList {
    pub items: Vec<Vacancy>,
    pub viewer: Option<SessionUser>,
}

impl VacancyService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn current_user(&self) -> Result<Option<SessionUser>> {
        Ok(self.backend.get_user().await?)
    }

    pub async fn list(&self, filter: VacancyFilter) -> Result<Vec<Vacancy>> {
        Ok(self.backend.list_vacancies(filter).await?)
    }

    pub async fn list_for_viewer(&self, query: &VacancyListQuery) -> Result<VacancyList> {
        let viewer = self.current_user().await?;
        let filter = query.to_filter(viewer.as_ref().map(|user| user.id));
        let items = self.list(filter).await?;
        Ok(VacancyList { items, viewer })
    }

    async fn require_user(&self, message: &str) -> std::result::Result<SessionUser, ActionFailure> {
        match self.backend.get_user().await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(ActionFailure::auth(message)),
            Err(e) => {
                error!("Auth lookup failed: {}", e);
                Err(ActionFailure::auth(message).with_details(e.message))
            }
        }
    }

    pub async fn create(&self, form: CreateVacancyForm) -> ActionResult {
        let user = self
            .require_user("You must be logged in to create a vacancy.")
            .await?;
        let input = form.into_input()?;

        let row = NewVacancy {
            title: input.title,
            company_name: input.company_name,
            description: input.description,
            status: input.status,
            owner_id: user.id,
            vacancy_type: VacancyType::Real,
        };

        let id = match self.backend.insert_vacancy(row).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                error!("Vacancy insert returned no id");
                return Err(ActionFailure::unexpected(
                    "Vacancy created but no id was returned.",
                ));
            }
            Err(e) => {
                error!(code = ?e.code, "Failed to create vacancy: {}", e.message);
                return Err(ActionFailure::backend("Failed to create vacancy", &e));
            }
        };

        info!(vacancy_id = id, owner_id = %user.id, "Vacancy created");
        Ok(ActionSuccess::new("Vacancy created successfully!")
            .with_vacancy_id(id)
            .revalidate(VACANCIES_PATH)
            .redirect_to(manage_skills_path(id)))
    }

    /// A conditional update that matched no row either lost a race, or was
    /// filtered out by row-level policy while the row still holds `expected`.
    async fn explain_unapplied_update(
        &self,
        vacancy_id: i64,
        expected: VacancyStatus,
    ) -> ActionFailure {
        match self.backend.get_vacancy(vacancy_id).await {
            Ok(None) => ActionFailure::not_found(format!("Vacancy {} not found.", vacancy_id)),
            Ok(Some(vacancy)) if vacancy.status == Some(expected) => {
                warn!(vacancy_id, "Status update matched no row; access denied by backend policy");
                ActionFailure::forbidden("You do not have permission to change this vacancy's status.")
            }
            Ok(Some(_)) => ActionFailure::conflict(
                "The vacancy's status changed in the meantime. Reload the page and try again.",
            ),
            Err(e) => ActionFailure::backend("Failed to reload vacancy", &e),
        }
    }

    /// Archives an open vacancy or reopens an archived one. The status is
    /// read from the backend, and the write only applies if it is unchanged.
    pub async fn toggle_status(&self, vacancy_id: i64) -> ActionResult {
        let user = self
            .require_user("You must be logged in to change a vacancy's status.")
            .await?;

        let vacancy = match self.backend.get_vacancy(vacancy_id).await {
            Ok(Some(vacancy)) => vacancy,
            Ok(None) => {
                return Err(ActionFailure::not_found(format!(
                    "Vacancy {} not found.",
                    vacancy_id
                )))
            }
            Err(e) => return Err(ActionFailure::backend("Failed to load vacancy", &e)),
        };

        if !vacancy.is_owned_by(Some(user.id)) {
            warn!(vacancy_id, user_id = %user.id, "Status change denied to non-owner");
            return Err(ActionFailure::forbidden(
                "Only the vacancy's owner can change its status.",
            ));
        }

        let Some(current) = vacancy.status else {
            return Err(ActionFailure::invalid_transition(
                "Action not allowed for a vacancy without a status. Only 'open' vacancies can be archived and 'archived' vacancies reactivated.",
            ));
        };
        let Some(next) = current.toggled() else {
            return Err(ActionFailure::invalid_transition(format!(
                "Action not allowed for the current status '{}'. Only 'open' vacancies can be archived and 'archived' vacancies reactivated.",
                current
            )));
        };

        match self
            .backend
            .update_vacancy_status(vacancy_id, current, next)
            .await
        {
            Ok(true) => {
                info!(vacancy_id, from = %current, to = %next, "Vacancy status changed");
                Ok(
                    ActionSuccess::new(format!("Vacancy status changed to '{}'.", next))
                        .with_vacancy_id(vacancy_id)
                        .revalidate(VACANCIES_PATH),
                )
            }
            Ok(false) => Err(self.explain_unapplied_update(vacancy_id, current).await),
            Err(e) => {
                error!(code = ?e.code, "Failed to update vacancy status: {}", e.message);
                Err(ActionFailure::backend("Failed to update vacancy status", &e))
            }
        }
    }
}
