use std::collections::HashSet;
use std::sync::Arc;

use tracing::{error, info};

use crate::backend::Backend;
use crate::dto::vacancy_dto::{AddVacancySkillForm, RemoveVacancySkillInput};
use crate::error::Result;
use crate::models::skill::Skill;
use crate::models::vacancy::{AssignedVacancySkill, Vacancy, VacancySkill};
use crate::services::action::{ActionFailure, ActionResult, ActionSuccess};
use crate::services::vacancy_service::manage_skills_path;

#[derive(Clone)]
pub struct VacancySkillService {
    backend: Arc<dyn Backend>,
}

/// Everything the manage-skills page shows for one vacancy.
pub struct ManageSkillsData {
    pub vacancy: Vacancy,
    pub assigned: Vec<AssignedVacancySkill>,
    /// The skill catalog minus skills already assigned to the vacancy.
    pub available: Vec<Skill>,
}

impl VacancySkillService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn manage_data(&self, vacancy_id: i64) -> Result<Option<ManageSkillsData>> {
        let Some(vacancy) = self.backend.get_vacancy(vacancy_id).await? else {
            return Ok(None);
        };
        let assigned = self.backend.list_vacancy_skills(vacancy_id).await?;
        let taken: HashSet<i64> = assigned.iter().map(|s| s.skill_id).collect();
        let available = self
            .backend
            .list_skills()
            .await?
            .into_iter()
            .filter(|skill| !taken.contains(&skill.id))
            .collect();

        Ok(Some(ManageSkillsData {
            vacancy,
            assigned,
            available,
        }))
    }

    pub async fn add(&self, form: AddVacancySkillForm) -> ActionResult {
        let input = form.into_input()?;

        let row = VacancySkill {
            vacancy_id: input.vacancy_id,
            skill_id: input.skill_id,
            required_proficiency_level: input.required_proficiency_level,
            is_mandatory: input.is_mandatory,
        };

        if let Err(e) = self.backend.insert_vacancy_skill(row).await {
            error!(code = ?e.code, "Failed to add skill to vacancy: {}", e.message);
            if e.is_unique_violation() {
                return Err(ActionFailure::duplicate(
                    "This skill is already associated with this vacancy.",
                ));
            }
            return Err(ActionFailure::backend("Failed to add skill to vacancy", &e));
        }

        info!(
            vacancy_id = input.vacancy_id,
            skill_id = input.skill_id,
            mandatory = input.is_mandatory,
            "Skill added to vacancy"
        );
        Ok(ActionSuccess::new("Skill added to vacancy successfully!")
            .with_vacancy_id(input.vacancy_id)
            .revalidate(manage_skills_path(input.vacancy_id)))
    }

    /// Removing a pair that is not associated succeeds without changes.
    pub async fn remove(&self, input: RemoveVacancySkillInput) -> ActionResult {
        let removed = match self
            .backend
            .delete_vacancy_skill(input.vacancy_id, input.skill_id)
            .await
        {
            Ok(removed) => removed,
            Err(e) => {
                error!(code = ?e.code, "Failed to remove skill from vacancy: {}", e.message);
                return Err(ActionFailure::backend("Failed to remove skill from vacancy", &e));
            }
        };

        info!(
            vacancy_id = input.vacancy_id,
            skill_id = input.skill_id,
            removed,
            "Skill removed from vacancy"
        );
        let message = if removed == 0 {
            "Skill was not associated with this vacancy; nothing to remove."
        } else {
            "Skill removed from vacancy successfully!"
        };
        Ok(ActionSuccess::new(message)
            .with_vacancy_id(input.vacancy_id)
            .revalidate(manage_skills_path(input.vacancy_id)))
    }
}
