use axum::response::Html;

use super::{flash_html, layout, status_badge, Flash};
use crate::dto::skill_dto::AssignSkillForm;
use crate::models::skill::Skill;
use crate::services::profile_skill_service::{AssignSkillOptions, ASSIGN_SKILL_PATH};
use crate::services::vacancy_service::VACANCIES_PATH;
use crate::services::vacancy_skill_service::ManageSkillsData;
use crate::utils::html::escape;

const DEFAULT_LEVEL: i32 = 3;

fn skill_options(skills: &[Skill], selected: &str) -> String {
    skills
        .iter()
        .map(|skill| {
            let id = skill.id.to_string();
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                id,
                if id == selected { " selected" } else { "" },
                escape(&skill.name)
            )
        })
        .collect()
}

pub fn manage_skills_page(data: &ManageSkillsData, flash: Option<&Flash>) -> Html<String> {
    let vacancy = &data.vacancy;

    let assigned = if data.assigned.is_empty() {
        r#"<div class="notice">No skills assigned to this vacancy yet.</div>"#.to_string()
    } else {
        let rows: String = data
            .assigned
            .iter()
            .map(|skill| {
                format!(
                    r#"<tr><td>{name}</td><td>{level}</td><td>{mandatory}</td><td><form method="post" action="{base}/{vacancy}/skills/{skill}/remove"><button type="submit">Remove</button></form></td></tr>
"#,
                    name = escape(skill.skill_name()),
                    level = skill
                        .required_proficiency_level
                        .map(|level| level.to_string())
                        .unwrap_or_else(|| "N/A".to_string()),
                    mandatory = if skill.is_mandatory { "Yes" } else { "No" },
                    base = VACANCIES_PATH,
                    vacancy = vacancy.id,
                    skill = skill.skill_id,
                )
            })
            .collect();
        format!(
            r#"<table>
<thead><tr><th>Skill</th><th>Required level</th><th>Mandatory</th><th></th></tr></thead>
<tbody>
{}</tbody>
</table>"#,
            rows
        )
    };

    let add_form = if data.available.is_empty() {
        r#"<p class="notice">Every catalog skill is already assigned to this vacancy.</p>"#
            .to_string()
    } else {
        format!(
            r#"<form method="post" action="{base}/{id}/skills">
<input type="hidden" name="vacancy_id" value="{id}">
<label for="skill_id">Skill</label>
<select id="skill_id" name="skill_id" required><option value="">Select a skill</option>{options}</select>
<label for="required_proficiency_level">Required proficiency level (1-5)</label>
<input id="required_proficiency_level" name="required_proficiency_level" type="number" min="1" max="5" value="{level}" required>
<label><input type="checkbox" name="is_mandatory" value="true"> Mandatory</label>
<p><button type="submit">Add skill</button></p>
</form>"#,
            base = VACANCIES_PATH,
            id = vacancy.id,
            options = skill_options(&data.available, ""),
            level = DEFAULT_LEVEL,
        )
    };

    layout(
        &format!("Manage skills: {}", vacancy.title),
        &format!(
            r#"<p><a href="{base}">Back to vacancies</a></p>
<h1>{title}</h1>
<p>{company} {badge}</p>
{flash}
<h2>Assigned skills</h2>
{assigned}
<h2>Add a skill</h2>
{add_form}"#,
            base = VACANCIES_PATH,
            title = escape(&vacancy.title),
            company = escape(vacancy.company_name.as_deref().unwrap_or("N/A")),
            badge = status_badge(vacancy.status),
            flash = flash_html(flash),
            assigned = assigned,
            add_form = add_form,
        ),
    )
}

pub fn assign_skill_page(
    options: &AssignSkillOptions,
    form: &AssignSkillForm,
    flash: Option<&Flash>,
) -> Html<String> {
    let profiles: String = options
        .profiles
        .iter()
        .map(|profile| {
            let id = profile.id.to_string();
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                id,
                if id == form.profile_id { " selected" } else { "" },
                escape(profile.display_name())
            )
        })
        .collect();
    let level = if form.proficiency_level.trim().is_empty() {
        DEFAULT_LEVEL.to_string()
    } else {
        escape(form.proficiency_level.trim())
    };

    layout(
        "Assign skill to profile",
        &format!(
            r#"<h1>Assign skill to profile</h1>
{flash}
<form method="post" action="{path}">
<label for="profile_id">Profile</label>
<select id="profile_id" name="profile_id" required><option value="">Select a profile</option>{profiles}</select>
<label for="skill_id">Skill</label>
<select id="skill_id" name="skill_id" required><option value="">Select a skill</option>{skills}</select>
<label for="proficiency_level">Proficiency level (1-5)</label>
<input id="proficiency_level" name="proficiency_level" type="number" min="1" max="5" value="{level}" required>
<p><button type="submit">Assign skill</button></p>
</form>"#,
            flash = flash_html(flash),
            path = ASSIGN_SKILL_PATH,
            profiles = profiles,
            skills = skill_options(&options.skills, form.skill_id.trim()),
            level = level,
        ),
    )
}
