use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::vacancy::{VacancyFilter, VacancyStatus, VacancyType};
use crate::services::action::ActionFailure;

use super::{is_checked, parse_id, parse_level, require};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateVacancyForm {
    pub title: String,
    pub company_name: String,
    pub description: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct CreateVacancyInput {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters."))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 200,
        message = "Company name must be between 1 and 200 characters."
    ))]
    pub company_name: String,
    pub description: Option<String>,
    pub status: VacancyStatus,
}

impl CreateVacancyForm {
    pub fn into_input(self) -> Result<CreateVacancyInput, ActionFailure> {
        const REQUIRED: &str = "Title, company name and status are required.";
        let title = require(&self.title, REQUIRED)?;
        let company_name = require(&self.company_name, REQUIRED)?;
        let status = require(&self.status, REQUIRED)?;
        let status: VacancyStatus = status
            .parse()
            .map_err(|_| ActionFailure::validation(format!("Unknown vacancy status '{}'.", status)))?;

        let description = self.description.trim();
        let input = CreateVacancyInput {
            title,
            company_name,
            description: (!description.is_empty()).then(|| description.to_string()),
            status,
        };
        input.validate()?;
        Ok(input)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddVacancySkillForm {
    pub vacancy_id: String,
    pub skill_id: String,
    pub required_proficiency_level: String,
    pub is_mandatory: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct AddVacancySkillInput {
    #[validate(range(min = 1, message = "Invalid vacancy id."))]
    pub vacancy_id: i64,
    #[validate(range(min = 1, message = "Invalid skill id."))]
    pub skill_id: i64,
    #[validate(range(
        min = 1,
        max = 5,
        message = "Required proficiency level must be between 1 and 5."
    ))]
    pub required_proficiency_level: i32,
    pub is_mandatory: bool,
}

impl AddVacancySkillForm {
    pub fn into_input(self) -> Result<AddVacancySkillInput, ActionFailure> {
        const REQUIRED: &str = "Vacancy, skill and required proficiency level are required.";
        let vacancy_id = require(&self.vacancy_id, REQUIRED)?;
        let skill_id = require(&self.skill_id, REQUIRED)?;
        let level = require(&self.required_proficiency_level, REQUIRED)?;

        let input = AddVacancySkillInput {
            vacancy_id: parse_id(&vacancy_id, "vacancy")?,
            skill_id: parse_id(&skill_id, "skill")?,
            required_proficiency_level: parse_level(&level)?,
            is_mandatory: is_checked(self.is_mandatory.as_deref()),
        };
        input.validate()?;
        Ok(input)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct RemoveVacancySkillInput {
    #[validate(range(min = 1, message = "Vacancy and skill ids are required for removal."))]
    pub vacancy_id: i64,
    #[validate(range(min = 1, message = "Vacancy and skill ids are required for removal."))]
    pub skill_id: i64,
}

impl RemoveVacancySkillInput {
    pub fn parse(vacancy_id: &str, skill_id: &str) -> Result<Self, ActionFailure> {
        let input = Self {
            vacancy_id: parse_id(vacancy_id, "vacancy")?,
            skill_id: parse_id(skill_id, "skill")?,
        };
        input.validate()?;
        Ok(input)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListScope {
    #[default]
    All,
    Mine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    #[default]
    Real,
    Template,
    All,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VacancyListQuery {
    pub scope: ListScope,
    pub kind: ListKind,
}

impl VacancyListQuery {
    /// Owner filtering needs a viewer; without one every owner is listed.
    pub fn to_filter(&self, viewer: Option<Uuid>) -> VacancyFilter {
        VacancyFilter {
            vacancy_type: match self.kind {
                ListKind::Real => Some(VacancyType::Real),
                ListKind::Template => Some(VacancyType::Template),
                ListKind::All => None,
            },
            owner_id: match self.scope {
                ListScope::Mine => viewer,
                ListScope::All => None,
            },
        }
    }
}
