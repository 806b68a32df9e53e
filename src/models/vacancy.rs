use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacancyStatus {
    Open,
    OnHold,
    Closed,
    Filled,
    Archived,
}

impl VacancyStatus {
    pub const ALL: [VacancyStatus; 5] = [
        VacancyStatus::Open,
        VacancyStatus::OnHold,
        VacancyStatus::Closed,
        VacancyStatus::Filled,
        VacancyStatus::Archived,
    ];

    /// Statuses an administrator may pick when creating a vacancy.
    pub const CREATABLE: [VacancyStatus; 4] = [
        VacancyStatus::Open,
        VacancyStatus::OnHold,
        VacancyStatus::Closed,
        VacancyStatus::Filled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VacancyStatus::Open => "open",
            VacancyStatus::OnHold => "on_hold",
            VacancyStatus::Closed => "closed",
            VacancyStatus::Filled => "filled",
            VacancyStatus::Archived => "archived",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VacancyStatus::Open => "Open",
            VacancyStatus::OnHold => "On hold",
            VacancyStatus::Closed => "Closed",
            VacancyStatus::Filled => "Filled",
            VacancyStatus::Archived => "Archived",
        }
    }

    /// The status the toggle action moves to. Only open and archived toggle.
    pub fn toggled(&self) -> Option<VacancyStatus> {
        match self {
            VacancyStatus::Open => Some(VacancyStatus::Archived),
            VacancyStatus::Archived => Some(VacancyStatus::Open),
            _ => None,
        }
    }
}

impl fmt::Display for VacancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VacancyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VacancyStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| format!("unknown vacancy status '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VacancyType {
    #[default]
    Real,
    Template,
}

impl VacancyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VacancyType::Real => "REAL",
            VacancyType::Template => "TEMPLATE",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vacancy {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<VacancyStatus>,
    #[serde(default)]
    pub owner_id: Option<Uuid>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub vacancy_type: VacancyType,
}

/// Treats an explicit `null` column like a missing one.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Vacancy {
    pub fn is_owned_by(&self, user_id: Option<Uuid>) -> bool {
        matches!((self.owner_id, user_id), (Some(owner), Some(user)) if owner == user)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewVacancy {
    pub title: String,
    pub company_name: String,
    pub description: Option<String>,
    pub status: VacancyStatus,
    pub owner_id: Uuid,
    #[serde(rename = "type")]
    pub vacancy_type: VacancyType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VacancySkill {
    pub vacancy_id: i64,
    pub skill_id: i64,
    pub required_proficiency_level: i32,
    pub is_mandatory: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillName {
    pub name: String,
}

/// A vacancy skill row joined with the skill's name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignedVacancySkill {
    pub skill_id: i64,
    #[serde(default)]
    pub required_proficiency_level: Option<i32>,
    #[serde(default)]
    pub is_mandatory: bool,
    #[serde(default)]
    pub skills: Option<SkillName>,
}

impl AssignedVacancySkill {
    pub fn skill_name(&self) -> &str {
        self.skills
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or("(unknown skill)")
    }
}

/// Which rows the vacancy list shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VacancyFilter {
    pub vacancy_type: Option<VacancyType>,
    pub owner_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_open_and_archived_toggle() {
        assert_eq!(VacancyStatus::Open.toggled(), Some(VacancyStatus::Archived));
        assert_eq!(VacancyStatus::Archived.toggled(), Some(VacancyStatus::Open));
        for status in [
            VacancyStatus::OnHold,
            VacancyStatus::Closed,
            VacancyStatus::Filled,
        ] {
            assert_eq!(status.toggled(), None);
        }
    }

    #[test]
    fn vacancy_row_deserializes_with_type_tag() {
        let row = json!({
            "id": 7,
            "title": "Backend Engineer",
            "company_name": null,
            "status": "on_hold",
            "owner_id": null,
            "type": "TEMPLATE"
        });
        let vacancy: Vacancy = serde_json::from_value(row).unwrap();
        assert_eq!(vacancy.status, Some(VacancyStatus::OnHold));
        assert_eq!(vacancy.vacancy_type, VacancyType::Template);
        assert!(!vacancy.is_owned_by(None));
    }

    #[test]
    fn null_or_missing_type_means_real() {
        let null_type: Vacancy =
            serde_json::from_value(json!({ "id": 1, "title": "x", "type": null })).unwrap();
        assert_eq!(null_type.vacancy_type, VacancyType::Real);

        let missing: Vacancy = serde_json::from_value(json!({ "id": 2, "title": "y" })).unwrap();
        assert_eq!(missing.vacancy_type, VacancyType::Real);
    }

    #[test]
    fn ownership_requires_a_known_viewer() {
        let owner = Uuid::new_v4();
        let vacancy = Vacancy {
            id: 1,
            title: "QA".into(),
            company_name: None,
            description: None,
            status: Some(VacancyStatus::Open),
            owner_id: Some(owner),
            created_at: None,
            vacancy_type: VacancyType::Real,
        };
        assert!(vacancy.is_owned_by(Some(owner)));
        assert!(!vacancy.is_owned_by(Some(Uuid::new_v4())));
        assert!(!vacancy.is_owned_by(None));
    }

    #[test]
    fn joined_skill_name_falls_back_when_missing() {
        let assigned: AssignedVacancySkill = serde_json::from_value(json!({
            "skill_id": 3,
            "required_proficiency_level": 4,
            "is_mandatory": true,
            "skills": { "name": "Rust" }
        }))
        .unwrap();
        assert_eq!(assigned.skill_name(), "Rust");

        let orphan: AssignedVacancySkill =
            serde_json::from_value(json!({ "skill_id": 9, "skills": null })).unwrap();
        assert_eq!(orphan.skill_name(), "(unknown skill)");
        assert!(!orphan.is_mandatory);
    }
}
