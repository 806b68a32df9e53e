use std::sync::Arc;

use tracing::{error, info};

use crate::backend::Backend;
use crate::dto::skill_dto::AssignSkillForm;
use crate::error::Result;
use crate::models::profile::{Profile, ProfileSkill};
use crate::models::skill::Skill;
use crate::services::action::{ActionFailure, ActionResult, ActionSuccess};

pub const ASSIGN_SKILL_PATH: &str = "/admin/assign-skill";

/// Tag stored on rows written by the admin assign-skill form.
pub const ADMIN_FORM_SOURCE: &str = "admin_assign_skill_form";

#[derive(Clone)]
pub struct ProfileSkillService {
    backend: Arc<dyn Backend>,
}

pub struct AssignSkillOptions {
    pub profiles: Vec<Profile>,
    pub skills: Vec<Skill>,
}

impl ProfileSkillService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn options(&self) -> Result<AssignSkillOptions> {
        let profiles = self.backend.list_profiles().await?;
        let skills = self.backend.list_skills().await?;
        Ok(AssignSkillOptions { profiles, skills })
    }

    pub async fn assign(&self, form: AssignSkillForm) -> ActionResult {
        let input = form.into_input()?;

        let row = ProfileSkill {
            profile_id: input.profile_id,
            skill_id: input.skill_id,
            proficiency_level: input.proficiency_level,
            source_of_assessment: ADMIN_FORM_SOURCE.to_string(),
        };

        if let Err(e) = self.backend.insert_profile_skill(row).await {
            error!(code = ?e.code, "Failed to assign skill to profile: {}", e.message);
            if e.is_unique_violation() {
                return Err(ActionFailure::duplicate(
                    "This skill is already associated with this profile.",
                ));
            }
            return Err(ActionFailure::backend("Failed to assign skill to profile", &e));
        }

        info!(
            profile_id = %input.profile_id,
            skill_id = input.skill_id,
            level = input.proficiency_level,
            "Skill assigned to profile"
        );
        Ok(ActionSuccess::new("Skill assigned to profile successfully!").revalidate(ASSIGN_SKILL_PATH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, MockBackend, UNIQUE_VIOLATION};
    use crate::services::action::FailureKind;
    use uuid::Uuid;

    fn form(level: &str) -> AssignSkillForm {
        AssignSkillForm {
            profile_id: Uuid::new_v4().to_string(),
            skill_id: "4".into(),
            proficiency_level: level.into(),
        }
    }

    #[tokio::test]
    async fn invalid_level_never_reaches_backend() {
        // No expectations: any backend call panics.
        let service = ProfileSkillService::new(Arc::new(MockBackend::new()));
        for level in ["0", "6", ""] {
            let err = service.assign(form(level)).await.unwrap_err();
            assert_eq!(err.kind, FailureKind::Validation);
        }
    }

    #[tokio::test]
    async fn insert_is_tagged_with_form_source() {
        let mut backend = MockBackend::new();
        backend
            .expect_insert_profile_skill()
            .withf(|row| {
                row.source_of_assessment == ADMIN_FORM_SOURCE
                    && row.skill_id == 4
                    && row.proficiency_level == 3
            })
            .times(1)
            .returning(|_| Ok(()));

        let ok = ProfileSkillService::new(Arc::new(backend))
            .assign(form("3"))
            .await
            .unwrap();
        assert_eq!(ok.revalidate, vec![ASSIGN_SKILL_PATH.to_string()]);
    }

    #[tokio::test]
    async fn unique_violation_maps_to_duplicate() {
        let mut backend = MockBackend::new();
        backend.expect_insert_profile_skill().returning(|_| {
            Err(BackendError::with_code(
                UNIQUE_VIOLATION,
                "duplicate key value violates unique constraint",
            ))
        });

        let err = ProfileSkillService::new(Arc::new(backend))
            .assign(form("2"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, FailureKind::Duplicate);
        assert_eq!(err.message, "This skill is already associated with this profile.");
    }

    #[tokio::test]
    async fn other_backend_errors_are_wrapped() {
        let mut backend = MockBackend::new();
        backend
            .expect_insert_profile_skill()
            .returning(|_| Err(BackendError::new("connection reset by peer")));

        let err = ProfileSkillService::new(Arc::new(backend))
            .assign(form("2"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, FailureKind::Backend);
        assert_eq!(
            err.message,
            "Failed to assign skill to profile: connection reset by peer"
        );
    }
}
