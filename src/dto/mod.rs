pub mod auth_dto;
pub mod skill_dto;
pub mod vacancy_dto;

use crate::services::action::ActionFailure;

/// Trimmed value of a required form field.
fn require(value: &str, message: &str) -> Result<String, ActionFailure> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ActionFailure::validation(message));
    }
    Ok(trimmed.to_string())
}

fn parse_id(value: &str, what: &str) -> Result<i64, ActionFailure> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ActionFailure::validation(format!("Invalid {} id.", what)))
}

fn parse_level(value: &str) -> Result<i32, ActionFailure> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| ActionFailure::validation("Proficiency level must be a whole number."))
}

/// HTML checkboxes submit their value only when checked.
fn is_checked(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "on" | "1" | "yes")
    )
}
