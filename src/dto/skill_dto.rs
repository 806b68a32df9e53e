use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::services::action::ActionFailure;

use super::{parse_id, parse_level, require};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignSkillForm {
    pub profile_id: String,
    pub skill_id: String,
    pub proficiency_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct AssignSkillInput {
    pub profile_id: Uuid,
    #[validate(range(min = 1, message = "Invalid skill id."))]
    pub skill_id: i64,
    #[validate(range(min = 1, max = 5, message = "Proficiency level must be between 1 and 5."))]
    pub proficiency_level: i32,
}

impl AssignSkillForm {
    pub fn into_input(self) -> Result<AssignSkillInput, ActionFailure> {
        const REQUIRED: &str = "Profile, skill and proficiency level are required.";
        let profile_id = require(&self.profile_id, REQUIRED)?;
        let skill_id = require(&self.skill_id, REQUIRED)?;
        let level = require(&self.proficiency_level, REQUIRED)?;

        let input = AssignSkillInput {
            profile_id: profile_id
                .parse()
                .map_err(|_| ActionFailure::validation("Invalid profile id."))?,
            skill_id: parse_id(&skill_id, "skill")?,
            proficiency_level: parse_level(&level)?,
        };
        input.validate()?;
        Ok(input)
    }
}
