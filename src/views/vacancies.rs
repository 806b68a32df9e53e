use axum::response::Html;
use uuid::Uuid;

use super::{flash_html, layout, status_badge, Flash};
use crate::dto::vacancy_dto::{CreateVacancyForm, ListKind, ListScope, VacancyListQuery};
use crate::models::vacancy::{Vacancy, VacancyStatus};
use crate::services::vacancy_service::{manage_skills_path, VacancyList, VACANCIES_PATH};
use crate::utils::html::escape;

/// Closes any open action menu when the user clicks outside of it.
const CLOSE_MENUS_SCRIPT: &str = r#"<script>
document.addEventListener('click', function (event) {
  document.querySelectorAll('details.action-menu[open]').forEach(function (menu) {
    if (!menu.contains(event.target)) { menu.removeAttribute('open'); }
  });
});
</script>"#;

pub fn toggle_label(status: Option<VacancyStatus>) -> &'static str {
    match status {
        Some(VacancyStatus::Open) => "Archive vacancy",
        Some(VacancyStatus::Archived) => "Reactivate vacancy",
        _ => "Change status",
    }
}

pub fn toggle_path(vacancy_id: i64) -> String {
    format!("{}/{}/toggle-status", VACANCIES_PATH, vacancy_id)
}

pub fn action_menu(vacancy: &Vacancy, viewer: Option<Uuid>) -> String {
    let mut items = vec![format!(
        r#"<li><a href="{}">Manage skills</a></li>"#,
        manage_skills_path(vacancy.id)
    )];

    if vacancy.is_owned_by(viewer) {
        items.push(format!(
            r#"<li><a href="{}/{}/edit">Edit</a></li>"#,
            VACANCIES_PATH, vacancy.id
        ));
        items.push(format!(
            r#"<li><a href="{}/{}/candidates">View candidates</a></li>"#,
            VACANCIES_PATH, vacancy.id
        ));
        let can_toggle = vacancy.status.and_then(|s| s.toggled()).is_some();
        items.push(format!(
            r#"<li><form method="post" action="{}"><button type="submit"{}>{}</button></form></li>"#,
            toggle_path(vacancy.id),
            if can_toggle { "" } else { " disabled" },
            toggle_label(vacancy.status)
        ));
    }

    format!(
        r#"<details class="action-menu"><summary aria-label="Actions for vacancy {}">&#8942;</summary><ul>{}</ul></details>"#,
        vacancy.id,
        items.join("")
    )
}

fn filter_links(query: &VacancyListQuery) -> String {
    let scopes = [(ListScope::All, "all", "All vacancies"), (ListScope::Mine, "mine", "My vacancies")];
    let kinds = [
        (ListKind::Real, "real", "Real"),
        (ListKind::Template, "template", "Templates"),
        (ListKind::All, "all", "Any type"),
    ];
    let kind_param = kinds
        .iter()
        .find(|(kind, _, _)| *kind == query.kind)
        .map(|(_, param, _)| *param)
        .unwrap_or("real");
    let scope_param = scopes
        .iter()
        .find(|(scope, _, _)| *scope == query.scope)
        .map(|(_, param, _)| *param)
        .unwrap_or("all");

    let scope_links: Vec<String> = scopes
        .iter()
        .map(|(scope, param, label)| {
            let text = if *scope == query.scope {
                format!("<strong>{}</strong>", label)
            } else {
                label.to_string()
            };
            format!(
                r#"<a href="{}?scope={}&amp;kind={}">{}</a>"#,
                VACANCIES_PATH, param, kind_param, text
            )
        })
        .collect();
    let kind_links: Vec<String> = kinds
        .iter()
        .map(|(kind, param, label)| {
            let text = if *kind == query.kind {
                format!("<strong>{}</strong>", label)
            } else {
                label.to_string()
            };
            format!(
                r#"<a href="{}?scope={}&amp;kind={}">{}</a>"#,
                VACANCIES_PATH, scope_param, param, text
            )
        })
        .collect();

    format!(
        r#"<nav class="filters">{} | {}</nav>"#,
        scope_links.join(" · "),
        kind_links.join(" · ")
    )
}

pub fn list_page(list: &VacancyList, query: &VacancyListQuery, flash: Option<&Flash>) -> Html<String> {
    let viewer = list.viewer.as_ref().map(|user| user.id);

    let table = if list.items.is_empty() {
        r#"<div class="notice">No vacancies yet. Create the first one to get started.</div>"#
            .to_string()
    } else {
        let rows: String = list
            .items
            .iter()
            .map(|vacancy| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    vacancy.id,
                    escape(&vacancy.title),
                    escape(
                        vacancy
                            .company_name
                            .as_deref()
                            .filter(|c| !c.trim().is_empty())
                            .unwrap_or("N/A")
                    ),
                    status_badge(vacancy.status),
                    action_menu(vacancy, viewer)
                )
            })
            .collect();
        format!(
            r#"<table>
<thead><tr><th>ID</th><th>Title</th><th>Company</th><th>Status</th><th>Actions</th></tr></thead>
<tbody>
{}</tbody>
</table>"#,
            rows
        )
    };

    layout(
        "Vacancies",
        &format!(
            r#"<h1>Vacancies</h1>
{flash}
<p><a href="{base}/create">Create vacancy</a></p>
{filters}
{table}
{script}"#,
            flash = flash_html(flash),
            base = VACANCIES_PATH,
            filters = filter_links(query),
            table = table,
            script = CLOSE_MENUS_SCRIPT,
        ),
    )
}

pub fn create_page(form: &CreateVacancyForm, flash: Option<&Flash>) -> Html<String> {
    let selected = form
        .status
        .parse::<VacancyStatus>()
        .unwrap_or(VacancyStatus::Open);
    let options: String = VacancyStatus::CREATABLE
        .iter()
        .map(|status| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                status.as_str(),
                if *status == selected { " selected" } else { "" },
                status.label()
            )
        })
        .collect();

    layout(
        "Create vacancy",
        &format!(
            r#"<h1>Create vacancy</h1>
{flash}
<form method="post" action="{base}/create">
<label for="title">Title</label>
<input id="title" name="title" required value="{title}">
<label for="company_name">Company name</label>
<input id="company_name" name="company_name" required value="{company}">
<label for="description">Description</label>
<textarea id="description" name="description" rows="6">{description}</textarea>
<label for="status">Status</label>
<select id="status" name="status">{options}</select>
<p><button type="submit">Create vacancy</button> <a href="{base}">Cancel</a></p>
</form>"#,
            flash = flash_html(flash),
            base = VACANCIES_PATH,
            title = escape(&form.title),
            company = escape(&form.company_name),
            description = escape(&form.description),
            options = options,
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::SessionUser;
    use crate::models::vacancy::VacancyType;

    fn vacancy(owner: Option<Uuid>, status: Option<VacancyStatus>) -> Vacancy {
        Vacancy {
            id: 7,
            title: "Backend <Engineer>".into(),
            company_name: None,
            description: None,
            status,
            owner_id: owner,
            created_at: None,
            vacancy_type: VacancyType::Real,
        }
    }

    #[test]
    fn non_owner_only_sees_manage_skills() {
        let menu = action_menu(&vacancy(Some(Uuid::new_v4()), Some(VacancyStatus::Open)), Some(Uuid::new_v4()));
        assert!(menu.contains("Manage skills"));
        assert!(!menu.contains("Edit"));
        assert!(!menu.contains("toggle-status"));
    }

    #[test]
    fn owner_menu_labels_follow_status() {
        let owner = Uuid::new_v4();
        let open = action_menu(&vacancy(Some(owner), Some(VacancyStatus::Open)), Some(owner));
        assert!(open.contains("Archive vacancy"));
        assert!(!open.contains("disabled"));

        let archived = action_menu(&vacancy(Some(owner), Some(VacancyStatus::Archived)), Some(owner));
        assert!(archived.contains("Reactivate vacancy"));

        let filled = action_menu(&vacancy(Some(owner), Some(VacancyStatus::Filled)), Some(owner));
        assert!(filled.contains("Change status"));
        assert!(filled.contains("disabled"));
    }

    #[test]
    fn list_page_escapes_and_fills_missing_company() {
        let list = VacancyList {
            items: vec![vacancy(None, None)],
            viewer: Some(SessionUser { id: Uuid::new_v4(), email: None }),
        };
        let Html(html) = list_page(&list, &VacancyListQuery::default(), None);
        assert!(html.contains("Backend &lt;Engineer&gt;"));
        assert!(html.contains("<td>N/A</td>"));
        assert!(html.contains(r#"<span class="badge badge-yellow">N/A</span>"#));
    }

    #[test]
    fn empty_list_shows_notice() {
        let list = VacancyList { items: vec![], viewer: None };
        let Html(html) = list_page(&list, &VacancyListQuery::default(), None);
        assert!(html.contains("No vacancies yet"));
    }

    #[test]
    fn create_page_defaults_to_open() {
        let Html(html) = create_page(&CreateVacancyForm::default(), None);
        assert!(html.contains(r#"<option value="open" selected>Open</option>"#));
        assert!(!html.contains(r#"value="archived""#));
    }
}
