use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use talentsync_admin::{
    backend::memory::{MemoryFactory, MemoryStore},
    config::Config,
    models::vacancy::{VacancySkill, VacancyStatus, VacancyType},
    routes, AppState,
};
use tower::ServiceExt;
use uuid::Uuid;

fn app(store: &MemoryStore) -> Router {
    let config = Config::memory("127.0.0.1:0");
    let factory = MemoryFactory::new(store.clone(), config.session_cookie.clone());
    routes::router(AppState::new(config, Arc::new(factory)))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn assign_skill_succeeds_once_then_reports_duplicate() {
    let store = MemoryStore::new();
    let profile = store.add_profile("Ana Souza");
    let skill = store.add_skill("Rust");
    let body = format!(
        "profile_id={}&skill_id={}&proficiency_level=4",
        profile.id, skill.id
    );

    let first = app(&store)
        .oneshot(post_form("/admin/assign-skill", &body))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert!(body_text(first)
        .await
        .contains("Skill assigned to profile successfully!"));

    let rows = store.profile_skills();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].proficiency_level, 4);
    assert_eq!(rows[0].source_of_assessment, "admin_assign_skill_form");

    let second = app(&store)
        .oneshot(post_form("/admin/assign-skill", &body))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert!(body_text(second)
        .await
        .contains("This skill is already associated with this profile."));
    assert_eq!(store.profile_skills().len(), 1);
}

#[tokio::test]
async fn assign_skill_rejects_bad_input_without_writing() {
    let store = MemoryStore::new();
    let profile = store.add_profile("Bruno Lima");
    let skill = store.add_skill("PostgreSQL");

    for level in ["0", "6"] {
        let response = app(&store)
            .oneshot(post_form(
                "/admin/assign-skill",
                &format!(
                    "profile_id={}&skill_id={}&proficiency_level={}",
                    profile.id, skill.id, level
                ),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response)
            .await
            .contains("Proficiency level must be between 1 and 5."));
    }

    let missing = app(&store)
        .oneshot(post_form(
            "/admin/assign-skill",
            &format!("profile_id={}&skill_id=&proficiency_level=3", profile.id),
        ))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(missing)
        .await
        .contains("Profile, skill and proficiency level are required."));

    assert!(store.profile_skills().is_empty());
}

#[tokio::test]
async fn assign_skill_page_lists_profiles_and_skills_by_name() {
    let store = MemoryStore::new();
    store.add_profile("Zoe");
    store.add_profile("Ana");
    store.add_skill("Terraform");
    store.add_skill("Ansible");

    let html = body_text(app(&store).oneshot(get("/admin/assign-skill")).await.unwrap()).await;
    assert!(html.find(">Ana<").unwrap() < html.find(">Zoe<").unwrap());
    assert!(html.find(">Ansible<").unwrap() < html.find(">Terraform<").unwrap());
    assert!(html.contains(r#"name="proficiency_level" type="number" min="1" max="5" value="3""#));
}

#[tokio::test]
async fn manage_skills_rejects_bad_and_unknown_ids() {
    let store = MemoryStore::new();

    let invalid = app(&store)
        .oneshot(get("/admin/vacancies/abc/manage-skills"))
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let unknown = app(&store)
        .oneshot(get("/admin/vacancies/404/manage-skills"))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn vacancy_skills_can_be_added_once_and_removed() {
    let store = MemoryStore::new();
    let vacancy = store.add_vacancy(
        "Platform Engineer",
        Some(Uuid::new_v4()),
        Some(VacancyStatus::Open),
        VacancyType::Real,
    );
    let rust = store.add_skill("Rust");
    let go = store.add_skill("Go");
    let add_uri = format!("/admin/vacancies/{}/skills", vacancy.id);
    let body = format!(
        "vacancy_id={}&skill_id={}&required_proficiency_level=4&is_mandatory=true",
        vacancy.id, rust.id
    );

    let added = app(&store).oneshot(post_form(&add_uri, &body)).await.unwrap();
    assert_eq!(added.status(), StatusCode::OK);
    let html = body_text(added).await;
    assert!(html.contains("Skill added to vacancy successfully!"));
    // Assigned skills drop out of the add dropdown.
    assert!(!html.contains(&format!(r#"<option value="{}">Rust</option>"#, rust.id)));
    assert!(html.contains(&format!(r#"<option value="{}">Go</option>"#, go.id)));
    assert_eq!(
        store.vacancy_skills(),
        vec![VacancySkill {
            vacancy_id: vacancy.id,
            skill_id: rust.id,
            required_proficiency_level: 4,
            is_mandatory: true,
        }]
    );

    let duplicate = app(&store).oneshot(post_form(&add_uri, &body)).await.unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
    assert!(body_text(duplicate)
        .await
        .contains("This skill is already associated with this vacancy."));

    let removed = app(&store)
        .oneshot(post_form(
            &format!("/admin/vacancies/{}/skills/{}/remove", vacancy.id, rust.id),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(removed.status(), StatusCode::OK);
    assert!(store.vacancy_skills().is_empty());
}

#[tokio::test]
async fn unchecked_mandatory_box_stores_false() {
    let store = MemoryStore::new();
    let vacancy = store.add_vacancy("Analyst", None, Some(VacancyStatus::Open), VacancyType::Real);
    let skill = store.add_skill("SQL");

    let response = app(&store)
        .oneshot(post_form(
            &format!("/admin/vacancies/{}/skills", vacancy.id),
            &format!("skill_id={}&required_proficiency_level=2", skill.id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!store.vacancy_skills()[0].is_mandatory);
}

#[tokio::test]
async fn removing_unassigned_skill_is_a_successful_no_op() {
    let store = MemoryStore::new();
    let vacancy = store.add_vacancy("Designer", None, Some(VacancyStatus::Open), VacancyType::Real);
    let skill = store.add_skill("Figma");

    let response = app(&store)
        .oneshot(post_form(
            &format!("/admin/vacancies/{}/skills/{}/remove", vacancy.id, skill.id),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("nothing to remove"));
    assert!(store.vacancy_skills().is_empty());
}
