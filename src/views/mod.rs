pub mod auth;
pub mod skills;
pub mod vacancies;

use axum::http::StatusCode;
use axum::response::Html;

use crate::models::vacancy::VacancyStatus;
use crate::services::action::{ActionFailure, ActionSuccess};
use crate::utils::html::{capitalize, escape};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f6f7f9; color: #1f2933; }
header { background: #1f2933; color: #fff; padding: 0.75rem 1.5rem; display: flex; gap: 1rem; align-items: center; }
header a { color: #fff; text-decoration: none; }
header form { margin-left: auto; }
main { max-width: 960px; margin: 1.5rem auto; padding: 0 1rem; }
table { width: 100%; border-collapse: collapse; background: #fff; }
th, td { padding: 0.5rem 0.75rem; border-bottom: 1px solid #e4e7eb; text-align: left; }
label { display: block; margin: 0.75rem 0 0.25rem; font-weight: 600; }
input, select, textarea { width: 100%; padding: 0.4rem; box-sizing: border-box; }
input[type=checkbox] { width: auto; }
button { padding: 0.4rem 0.9rem; cursor: pointer; }
button[disabled] { cursor: not-allowed; opacity: 0.5; }
.flash { padding: 0.75rem 1rem; border-radius: 4px; margin-bottom: 1rem; }
.flash-success { background: #e3f9e5; color: #05400a; }
.flash-error { background: #ffe3e3; color: #610404; }
.badge { padding: 0.15rem 0.5rem; border-radius: 9999px; font-size: 0.8rem; font-weight: 600; }
.badge-green { background: #e3f9e5; color: #05400a; }
.badge-red { background: #ffe3e3; color: #610404; }
.badge-blue { background: #dceefb; color: #0b3d91; }
.badge-yellow { background: #fffbea; color: #8d2b0b; }
.notice { background: #fff; padding: 1.5rem; text-align: center; color: #616e7c; }
details.action-menu { position: relative; }
details.action-menu > summary { list-style: none; cursor: pointer; }
details.action-menu ul { position: absolute; right: 0; z-index: 10; background: #fff; border: 1px solid #cbd2d9; list-style: none; margin: 0; padding: 0.25rem 0; min-width: 12rem; }
details.action-menu li a, details.action-menu li button { display: block; width: 100%; padding: 0.4rem 0.9rem; background: none; border: 0; text-align: left; color: inherit; text-decoration: none; }
"#;

/// Message shown above a form after an action ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Success(String),
    Error(String),
}

impl Flash {
    pub fn render(&self) -> String {
        match self {
            Flash::Success(message) => format!(
                r#"<div class="flash flash-success" role="status">{}</div>"#,
                escape(message)
            ),
            Flash::Error(message) => format!(
                r#"<div class="flash flash-error" role="alert">{}</div>"#,
                escape(message)
            ),
        }
    }
}

impl From<&ActionSuccess> for Flash {
    fn from(ok: &ActionSuccess) -> Self {
        Flash::Success(ok.message.clone())
    }
}

impl From<&ActionFailure> for Flash {
    fn from(failure: &ActionFailure) -> Self {
        match &failure.details {
            Some(details) => Flash::Error(format!("{} ({})", failure.message, details)),
            None => Flash::Error(failure.message.clone()),
        }
    }
}

pub(crate) fn flash_html(flash: Option<&Flash>) -> String {
    flash.map(Flash::render).unwrap_or_default()
}

pub fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | TalentSync Admin</title>
<style>{style}</style>
</head>
<body>
<header>
<a href="/"><strong>TalentSync</strong></a>
<a href="/admin/vacancies">Vacancies</a>
<a href="/admin/assign-skill">Assign skill</a>
<form method="post" action="/logout"><button type="submit">Sign out</button></form>
</header>
<main>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
        style = STYLE,
        body = body,
    ))
}

pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let heading = status.canonical_reason().unwrap_or("Error");
    layout(
        heading,
        &format!(
            r#"<h1>{} {}</h1>
<div class="flash flash-error" role="alert">{}</div>
<p><a href="/admin/vacancies">Back to vacancies</a></p>"#,
            status.as_u16(),
            escape(heading),
            escape(message)
        ),
    )
}

/// Badge color class for a vacancy status.
pub fn badge_class(status: Option<VacancyStatus>) -> &'static str {
    match status {
        Some(VacancyStatus::Open) => "badge-green",
        Some(VacancyStatus::Closed) => "badge-red",
        Some(VacancyStatus::Filled) => "badge-blue",
        _ => "badge-yellow",
    }
}

pub fn badge_label(status: Option<VacancyStatus>) -> String {
    status
        .map(|status| capitalize(status.as_str()))
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn status_badge(status: Option<VacancyStatus>) -> String {
    format!(
        r#"<span class="badge {}">{}</span>"#,
        badge_class(status),
        escape(&badge_label(status))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_colors_follow_status() {
        assert_eq!(badge_class(Some(VacancyStatus::Open)), "badge-green");
        assert_eq!(badge_class(Some(VacancyStatus::Closed)), "badge-red");
        assert_eq!(badge_class(Some(VacancyStatus::Filled)), "badge-blue");
        assert_eq!(badge_class(Some(VacancyStatus::OnHold)), "badge-yellow");
        assert_eq!(badge_class(Some(VacancyStatus::Archived)), "badge-yellow");
        assert_eq!(badge_class(None), "badge-yellow");
    }

    #[test]
    fn badge_label_capitalizes_or_falls_back() {
        assert_eq!(badge_label(Some(VacancyStatus::Open)), "Open");
        assert_eq!(badge_label(Some(VacancyStatus::OnHold)), "On_hold");
        assert_eq!(badge_label(None), "N/A");
    }

    #[test]
    fn flash_escapes_messages() {
        let html = Flash::Error("<b>nope</b>".into()).render();
        assert!(html.contains("&lt;b&gt;nope&lt;/b&gt;"));
        assert!(html.contains("flash-error"));
    }

    #[test]
    fn failure_details_are_shown() {
        let failure = ActionFailure::validation("Bad input.").with_details("code 22P02");
        assert_eq!(
            Flash::from(&failure),
            Flash::Error("Bad input. (code 22P02)".into())
        );
    }
}
