use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::NewAccount;
use crate::services::action::ActionFailure;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SignUpForm {
    #[validate(length(min = 1, message = "Full name is required."))]
    pub full_name: String,
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,
}

impl SignUpForm {
    pub fn into_account(self) -> Result<NewAccount, ActionFailure> {
        let form = SignUpForm {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
        };
        form.validate()?;
        Ok(NewAccount {
            full_name: form.full_name,
            email: form.email,
            password: form.password,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn into_credentials(self) -> Result<(String, String), ActionFailure> {
        let email = self.email.trim().to_string();
        if email.is_empty() || self.password.is_empty() {
            return Err(ActionFailure::validation("Email and password are required."));
        }
        Ok((email, self.password))
    }
}
