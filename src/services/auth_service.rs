use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::Backend;
use crate::dto::auth_dto::{LoginForm, SignUpForm};
use crate::models::user::Session;
use crate::services::action::{ActionFailure, ActionResult, ActionSuccess};

pub const LOGIN_PATH: &str = "/login";

pub const CONFIRM_EMAIL_NOTICE: &str =
    "Account created! Check your email to confirm your account.";

const USER_ALREADY_EXISTS: &str = "user_already_exists";

#[derive(Clone)]
pub struct AuthService {
    backend: Arc<dyn Backend>,
}

impl AuthService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn sign_up(&self, form: SignUpForm) -> ActionResult {
        let account = form.into_account()?;
        let email = account.email.clone();

        if let Err(e) = self.backend.sign_up(account).await {
            warn!(code = ?e.code, "Sign-up failed: {}", e.message);
            if e.code.as_deref() == Some(USER_ALREADY_EXISTS) {
                return Err(ActionFailure::duplicate(
                    "An account with this email already exists.",
                ));
            }
            return Err(ActionFailure::backend("Sign-up failed", &e));
        }

        info!(%email, "Account registered");
        Ok(ActionSuccess::new(CONFIRM_EMAIL_NOTICE).redirect_to(LOGIN_PATH))
    }

    pub async fn sign_in(&self, form: LoginForm) -> Result<Session, ActionFailure> {
        let (email, password) = form.into_credentials()?;
        match self.backend.sign_in_with_password(email, password).await {
            Ok(session) => {
                info!(user_id = %session.user.id, "User signed in");
                Ok(session)
            }
            Err(e) => {
                warn!(code = ?e.code, "Sign-in failed: {}", e.message);
                Err(ActionFailure::auth(format!("Sign-in failed: {}", e.message)))
            }
        }
    }

    /// Revokes the session on the backend. The caller clears the cookie
    /// whether or not this succeeds.
    pub async fn sign_out(&self) -> Result<(), ActionFailure> {
        match self.backend.sign_out().await {
            Ok(()) => {
                info!("Session revoked");
                Ok(())
            }
            Err(e) => {
                warn!(code = ?e.code, "Sign-out failed: {}", e.message);
                Err(ActionFailure::backend("Sign-out failed", &e))
            }
        }
    }
}
