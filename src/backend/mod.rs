pub mod memory;
pub mod supabase;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;

use crate::models::{
    profile::{Profile, ProfileSkill},
    skill::Skill,
    user::{NewAccount, Session, SessionUser},
    vacancy::{AssignedVacancySkill, NewVacancy, Vacancy, VacancyFilter, VacancySkill, VacancyStatus},
};

/// Postgres SQLSTATE for a unique constraint violation.
pub const UNIQUE_VIOLATION: &str = "23505";

pub type BackendResult<T> = std::result::Result<T, BackendError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    pub code: Option<String>,
    pub message: String,
    pub status: Option<u16>,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
            status: None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.code.as_deref() == Some(UNIQUE_VIOLATION)
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            code: None,
            message: err.to_string(),
            status: err.status().map(|s| s.as_u16()),
        }
    }
}

/// Table and auth operations the console performs against the hosted backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_profiles(&self) -> BackendResult<Vec<Profile>>;

    async fn list_skills(&self) -> BackendResult<Vec<Skill>>;

    async fn insert_profile_skill(&self, row: ProfileSkill) -> BackendResult<()>;

    async fn list_vacancies(&self, filter: VacancyFilter) -> BackendResult<Vec<Vacancy>>;

    async fn get_vacancy(&self, id: i64) -> BackendResult<Option<Vacancy>>;

    /// Returns the new row's id, or `None` if the backend did not report one.
    async fn insert_vacancy(&self, row: NewVacancy) -> BackendResult<Option<i64>>;

    /// Sets `to` only where the stored status still equals `from`.
    /// Returns whether a row was updated.
    async fn update_vacancy_status(
        &self,
        id: i64,
        from: VacancyStatus,
        to: VacancyStatus,
    ) -> BackendResult<bool>;

    async fn list_vacancy_skills(&self, vacancy_id: i64) -> BackendResult<Vec<AssignedVacancySkill>>;

    async fn insert_vacancy_skill(&self, row: VacancySkill) -> BackendResult<()>;

    /// Returns the number of rows removed.
    async fn delete_vacancy_skill(&self, vacancy_id: i64, skill_id: i64) -> BackendResult<u64>;

    async fn get_user(&self) -> BackendResult<Option<SessionUser>>;

    async fn sign_up(&self, account: NewAccount) -> BackendResult<()>;

    async fn sign_in_with_password(&self, email: String, password: String) -> BackendResult<Session>;

    /// Revokes the client's session token. A client without one is a no-op.
    async fn sign_out(&self) -> BackendResult<()>;
}

/// Builds backend clients scoped to a single request.
pub trait ClientFactory: Send + Sync {
    /// A client carrying only the public API key.
    fn browser_client(&self) -> Arc<dyn Backend>;

    /// A client bound to the caller's session, read from request cookies.
    /// Refreshing the session cookie is left to the login routes.
    fn server_client(&self, headers: &HeaderMap) -> Arc<dyn Backend>;
}
