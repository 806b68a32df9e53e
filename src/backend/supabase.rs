use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{Backend, BackendError, BackendResult, ClientFactory};
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    profile::{Profile, ProfileSkill},
    skill::Skill,
    user::{NewAccount, Session, SessionUser},
    vacancy::{AssignedVacancySkill, NewVacancy, Vacancy, VacancyFilter, VacancySkill, VacancyStatus},
};
use crate::utils::cookies::session_token;

const VACANCY_COLUMNS: &str = "id,title,company_name,description,status,owner_id,created_at,type";

/// Builds PostgREST/GoTrue clients that share one connection pool.
#[derive(Clone)]
pub struct SupabaseFactory {
    http: Client,
    base_url: String,
    anon_key: String,
    jwt_secret: Option<String>,
    session_cookie: String,
}

impl SupabaseFactory {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            base_url: config.supabase_url.clone(),
            anon_key: config.supabase_anon_key.clone(),
            jwt_secret: config.supabase_jwt_secret.clone(),
            session_cookie: config.session_cookie.clone(),
        })
    }

    fn client(&self, access_token: Option<String>) -> SupabaseClient {
        SupabaseClient {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            anon_key: self.anon_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            access_token,
        }
    }
}

impl ClientFactory for SupabaseFactory {
    fn browser_client(&self) -> Arc<dyn Backend> {
        Arc::new(self.client(None))
    }

    fn server_client(&self, headers: &HeaderMap) -> Arc<dyn Backend> {
        Arc::new(self.client(session_token(headers, &self.session_cookie)))
    }
}

#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    anon_key: String,
    jwt_secret: Option<String>,
    access_token: Option<String>,
}

/// Error bodies from PostgREST (`code`, `message`) and GoTrue
/// (`msg`, `error_description`, `error_code`) share this shape.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<JsonValue>,
    error_code: Option<String>,
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
    details: Option<String>,
}

impl ErrorBody {
    fn into_error(self, status: StatusCode) -> BackendError {
        let code = match self.code {
            Some(JsonValue::String(code)) => Some(code),
            _ => self.error_code,
        };
        let message = self
            .message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        let message = match self.details {
            Some(details) if !details.is_empty() => format!("{} ({})", message, details),
            _ => message,
        };
        BackendError {
            code,
            message,
            status: Some(status.as_u16()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IdRow {
    id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Uuid,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatusPatch {
    status: VacancyStatus,
}

impl SupabaseClient {
    fn rest(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        req.header("apikey", &self.anon_key).bearer_auth(bearer)
    }

    async fn check(resp: Response) -> BackendResult<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_else(|_| ErrorBody {
            message: (!body.is_empty()).then_some(body),
            ..ErrorBody::default()
        });
        Err(parsed.into_error(status))
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> BackendResult<T> {
        let resp = Self::check(self.authorize(req).send().await?).await?;
        Ok(resp.json::<T>().await?)
    }

    async fn execute(&self, req: RequestBuilder) -> BackendResult<()> {
        Self::check(self.authorize(req).send().await?).await?;
        Ok(())
    }

    fn decode_local(&self, secret: &str, token: &str) -> Option<SessionUser> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        ) {
            Ok(data) => Some(SessionUser {
                id: data.claims.sub,
                email: data.claims.email,
            }),
            Err(e) => {
                warn!("Rejected session token: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl Backend for SupabaseClient {
    async fn list_profiles(&self) -> BackendResult<Vec<Profile>> {
        let req = self
            .http
            .get(self.rest("profiles"))
            .query(&[("select", "id,full_name"), ("order", "full_name.asc")]);
        self.fetch(req).await
    }

    async fn list_skills(&self) -> BackendResult<Vec<Skill>> {
        let req = self
            .http
            .get(self.rest("skills"))
            .query(&[("select", "id,name"), ("order", "name.asc")]);
        self.fetch(req).await
    }

    async fn insert_profile_skill(&self, row: ProfileSkill) -> BackendResult<()> {
        let req = self
            .http
            .post(self.rest("profile_skills"))
            .header("Prefer", "return=minimal")
            .json(&row);
        self.execute(req).await
    }

    async fn list_vacancies(&self, filter: VacancyFilter) -> BackendResult<Vec<Vacancy>> {
        let mut params: Vec<(&str, String)> = vec![
            ("select", VACANCY_COLUMNS.to_string()),
            ("order", "id.desc".to_string()),
        ];
        if let Some(vacancy_type) = filter.vacancy_type {
            params.push(("type", format!("eq.{}", vacancy_type.as_str())));
        }
        if let Some(owner_id) = filter.owner_id {
            params.push(("owner_id", format!("eq.{}", owner_id)));
        }
        let req = self.http.get(self.rest("vacancies")).query(&params);
        self.fetch(req).await
    }

    async fn get_vacancy(&self, id: i64) -> BackendResult<Option<Vacancy>> {
        let req = self.http.get(self.rest("vacancies")).query(&[
            ("select", VACANCY_COLUMNS.to_string()),
            ("id", format!("eq.{}", id)),
        ]);
        let rows: Vec<Vacancy> = self.fetch(req).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_vacancy(&self, row: NewVacancy) -> BackendResult<Option<i64>> {
        let req = self
            .http
            .post(self.rest("vacancies"))
            .query(&[("select", "id")])
            .header("Prefer", "return=representation")
            .json(&[row]);
        let rows: Vec<IdRow> = self.fetch(req).await?;
        Ok(rows.into_iter().next().and_then(|row| row.id))
    }

    async fn update_vacancy_status(
        &self,
        id: i64,
        from: VacancyStatus,
        to: VacancyStatus,
    ) -> BackendResult<bool> {
        let req = self
            .http
            .patch(self.rest("vacancies"))
            .query(&[
                ("select", "id".to_string()),
                ("id", format!("eq.{}", id)),
                ("status", format!("eq.{}", from)),
            ])
            .header("Prefer", "return=representation")
            .json(&StatusPatch { status: to });
        let rows: Vec<IdRow> = self.fetch(req).await?;
        Ok(!rows.is_empty())
    }

    async fn list_vacancy_skills(&self, vacancy_id: i64) -> BackendResult<Vec<AssignedVacancySkill>> {
        let req = self.http.get(self.rest("vacancy_skills")).query(&[
            (
                "select",
                "skill_id,required_proficiency_level,is_mandatory,skills(name)".to_string(),
            ),
            ("vacancy_id", format!("eq.{}", vacancy_id)),
            ("order", "skill_id.asc".to_string()),
        ]);
        self.fetch(req).await
    }

    async fn insert_vacancy_skill(&self, row: VacancySkill) -> BackendResult<()> {
        let req = self
            .http
            .post(self.rest("vacancy_skills"))
            .header("Prefer", "return=minimal")
            .json(&row);
        self.execute(req).await
    }

    async fn delete_vacancy_skill(&self, vacancy_id: i64, skill_id: i64) -> BackendResult<u64> {
        let req = self
            .http
            .delete(self.rest("vacancy_skills"))
            .query(&[
                ("select", "skill_id".to_string()),
                ("vacancy_id", format!("eq.{}", vacancy_id)),
                ("skill_id", format!("eq.{}", skill_id)),
            ])
            .header("Prefer", "return=representation");
        let rows: Vec<JsonValue> = self.fetch(req).await?;
        Ok(rows.len() as u64)
    }

    async fn get_user(&self) -> BackendResult<Option<SessionUser>> {
        let Some(token) = self.access_token.as_deref() else {
            return Ok(None);
        };

        if let Some(secret) = self.jwt_secret.as_deref() {
            return Ok(self.decode_local(secret, token));
        }

        let resp = self
            .http
            .get(self.auth("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;
        if matches!(
            resp.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            debug!("Session token rejected by auth service");
            return Ok(None);
        }
        let resp = Self::check(resp).await?;
        Ok(Some(resp.json::<SessionUser>().await?))
    }

    async fn sign_up(&self, account: NewAccount) -> BackendResult<()> {
        let body = json!({
            "email": account.email,
            "password": account.password,
            "data": { "full_name": account.full_name },
        });
        let req = self.http.post(self.auth("signup")).json(&body);
        self.execute(req).await
    }

    async fn sign_in_with_password(&self, email: String, password: String) -> BackendResult<Session> {
        let body = json!({ "email": email, "password": password });
        let req = self
            .http
            .post(self.auth("token"))
            .query(&[("grant_type", "password")])
            .json(&body);
        self.fetch(req).await
    }

    async fn sign_out(&self) -> BackendResult<()> {
        let Some(token) = self.access_token.as_deref() else {
            return Ok(());
        };
        let resp = self
            .http
            .post(self.auth("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;
        if matches!(
            resp.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
        ) {
            debug!("Session already gone at sign-out");
            return Ok(());
        }
        Self::check(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn client(token: Option<&str>, secret: Option<&str>) -> SupabaseClient {
        SupabaseClient {
            http: Client::new(),
            base_url: "http://localhost:54321".into(),
            anon_key: "anon".into(),
            jwt_secret: secret.map(str::to_string),
            access_token: token.map(str::to_string),
        }
    }

    #[test]
    fn postgrest_unique_violation_keeps_sqlstate() {
        let body: ErrorBody = serde_json::from_value(json!({
            "code": "23505",
            "details": "Key (profile_id, skill_id) already exists.",
            "hint": null,
            "message": "duplicate key value violates unique constraint"
        }))
        .unwrap();
        let err = body.into_error(StatusCode::CONFLICT);
        assert!(err.is_unique_violation());
        assert_eq!(err.status, Some(409));
        assert!(err.message.starts_with("duplicate key value"));
    }

    #[test]
    fn gotrue_error_uses_msg_and_error_code() {
        let body: ErrorBody = serde_json::from_value(json!({
            "code": 422,
            "error_code": "weak_password",
            "msg": "Password should be at least 6 characters."
        }))
        .unwrap();
        let err = body.into_error(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code.as_deref(), Some("weak_password"));
        assert_eq!(err.message, "Password should be at least 6 characters.");
    }

    #[tokio::test]
    async fn local_jwt_verification_reads_subject() {
        let user_id = Uuid::new_v4();
        let claims = json!({
            "sub": user_id,
            "email": "admin@talentsync.test",
            "exp": chrono::Utc::now().timestamp() + 3600,
        });
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"jwt-secret"),
        )
        .unwrap();

        let user = client(Some(&token), Some("jwt-secret"))
            .get_user()
            .await
            .unwrap()
            .expect("user from token");
        assert_eq!(user.id, user_id);
        assert_eq!(user.email.as_deref(), Some("admin@talentsync.test"));

        let forged = client(Some(&token), Some("other-secret")).get_user().await.unwrap();
        assert!(forged.is_none());
    }

    #[tokio::test]
    async fn no_token_means_no_user() {
        assert!(client(None, None).get_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sign_out_without_token_skips_the_request() {
        // The base url points nowhere; a request would fail.
        client(None, None).sign_out().await.unwrap();
    }
}
