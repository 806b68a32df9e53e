use axum::http::StatusCode;
use validator::ValidationErrors;

use crate::backend::BackendError;

pub type ActionResult = std::result::Result<ActionSuccess, ActionFailure>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSuccess {
    pub message: String,
    pub vacancy_id: Option<i64>,
    /// Page paths whose rendered content changed.
    pub revalidate: Vec<String>,
    pub redirect: Option<String>,
}

impl ActionSuccess {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            vacancy_id: None,
            revalidate: Vec::new(),
            redirect: None,
        }
    }

    pub fn with_vacancy_id(mut self, id: i64) -> Self {
        self.vacancy_id = Some(id);
        self
    }

    pub fn revalidate(mut self, path: impl Into<String>) -> Self {
        self.revalidate.push(path.into());
        self
    }

    pub fn redirect_to(mut self, path: impl Into<String>) -> Self {
        self.redirect = Some(path.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    Duplicate,
    Auth,
    Forbidden,
    NotFound,
    InvalidTransition,
    Conflict,
    Backend,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ActionFailure {
    pub kind: FailureKind,
    pub message: String,
    pub details: Option<String>,
}

impl ActionFailure {
    fn of(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::of(FailureKind::Validation, message)
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::of(FailureKind::Duplicate, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::of(FailureKind::Auth, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::of(FailureKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::of(FailureKind::NotFound, message)
    }

    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::of(FailureKind::InvalidTransition, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::of(FailureKind::Conflict, message)
    }

    /// Wraps a backend error, appending the backend's raw message.
    pub fn backend(context: &str, err: &BackendError) -> Self {
        Self {
            kind: FailureKind::Backend,
            message: format!("{}: {}", context, err.message),
            details: err.code.as_ref().map(|code| format!("code {}", code)),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::of(FailureKind::Backend, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            FailureKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            FailureKind::InvalidTransition => StatusCode::BAD_REQUEST,
            FailureKind::Duplicate | FailureKind::Conflict => StatusCode::CONFLICT,
            FailureKind::Auth => StatusCode::UNAUTHORIZED,
            FailureKind::Forbidden => StatusCode::FORBIDDEN,
            FailureKind::NotFound => StatusCode::NOT_FOUND,
            FailureKind::Backend => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<ValidationErrors> for ActionFailure {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        let message = fields
            .iter()
            .flat_map(|(field, errs)| errs.iter().map(move |err| (field, err)))
            .map(|(field, err)| {
                err.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}.", field))
            })
            .next()
            .unwrap_or_else(|| "Invalid input.".to_string());
        ActionFailure::validation(message)
    }
}
