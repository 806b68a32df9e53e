use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use axum::http::HeaderMap;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::{Backend, BackendError, BackendResult, ClientFactory, UNIQUE_VIOLATION};
use crate::models::{
    profile::{Profile, ProfileSkill},
    skill::Skill,
    user::{NewAccount, Session, SessionUser},
    vacancy::{
        AssignedVacancySkill, NewVacancy, SkillName, Vacancy, VacancyFilter, VacancySkill,
        VacancyStatus, VacancyType,
    },
};
use crate::utils::cookies::session_token;

const FOREIGN_KEY_VIOLATION: &str = "23503";
const SESSION_TTL_SECS: i64 = 3600;

#[derive(Debug, Clone)]
struct Account {
    user_id: Uuid,
    email: String,
    password: String,
}

#[derive(Debug, Clone, Copy)]
struct StoredSession {
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    profiles: Vec<Profile>,
    skills: Vec<Skill>,
    profile_skills: Vec<ProfileSkill>,
    vacancies: Vec<Vacancy>,
    vacancy_skills: Vec<VacancySkill>,
    accounts: Vec<Account>,
    sessions: HashMap<String, StoredSession>,
    next_skill_id: i64,
    next_vacancy_id: i64,
}

/// In-process stand-in for the hosted backend. Enforces the same unique and
/// foreign key constraints the hosted schema does.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with a small skill catalog and two profiles.
    pub fn with_demo_data() -> Self {
        let store = Self::new();
        for name in ["Rust", "PostgreSQL", "Kubernetes", "Communication", "React"] {
            store.add_skill(name);
        }
        store.add_profile("Ana Souza");
        store.add_profile("Bruno Lima");
        store
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store mutex poisoned")
    }

    pub fn add_skill(&self, name: &str) -> Skill {
        let mut tables = self.tables();
        tables.next_skill_id += 1;
        let skill = Skill {
            id: tables.next_skill_id,
            name: name.to_string(),
        };
        tables.skills.push(skill.clone());
        skill
    }

    pub fn add_profile(&self, full_name: &str) -> Profile {
        let profile = Profile {
            id: Uuid::new_v4(),
            full_name: Some(full_name.to_string()),
        };
        self.tables().profiles.push(profile.clone());
        profile
    }

    pub fn add_vacancy(
        &self,
        title: &str,
        owner_id: Option<Uuid>,
        status: Option<VacancyStatus>,
        vacancy_type: VacancyType,
    ) -> Vacancy {
        let mut tables = self.tables();
        tables.next_vacancy_id += 1;
        let vacancy = Vacancy {
            id: tables.next_vacancy_id,
            title: title.to_string(),
            company_name: None,
            description: None,
            status,
            owner_id,
            created_at: Some(Utc::now()),
            vacancy_type,
        };
        tables.vacancies.push(vacancy.clone());
        vacancy
    }

    /// Issues a session token for `user_id` without going through sign-in.
    pub fn open_session(&self, user_id: Uuid) -> String {
        self.open_session_for(user_id, Duration::seconds(SESSION_TTL_SECS))
    }

    /// Like `open_session`, with an explicit lifetime. A non-positive `ttl`
    /// yields a token that is already expired.
    pub fn open_session_for(&self, user_id: Uuid, ttl: Duration) -> String {
        self.tables().issue_session(user_id, ttl)
    }

    pub fn session_count(&self) -> usize {
        self.tables().sessions.len()
    }

    pub fn profile_skills(&self) -> Vec<ProfileSkill> {
        self.tables().profile_skills.clone()
    }

    pub fn vacancy_skills(&self) -> Vec<VacancySkill> {
        self.tables().vacancy_skills.clone()
    }

    pub fn vacancies(&self) -> Vec<Vacancy> {
        self.tables().vacancies.clone()
    }

    pub fn vacancy(&self, id: i64) -> Option<Vacancy> {
        self.tables().vacancies.iter().find(|v| v.id == id).cloned()
    }

    pub fn client(&self, access_token: Option<String>) -> MemoryClient {
        MemoryClient {
            store: self.clone(),
            access_token,
        }
    }
}

impl Tables {
    /// Expired sessions are dropped on every issue, so the map only holds
    /// live tokens plus those that lapsed since the last sign-in.
    fn issue_session(&mut self, user_id: Uuid, ttl: Duration) -> String {
        let now = Utc::now();
        self.sessions.retain(|_, session| session.expires_at > now);
        let token = Uuid::new_v4().simple().to_string();
        self.sessions.insert(
            token.clone(),
            StoredSession {
                user_id,
                expires_at: now + ttl,
            },
        );
        token
    }
}

fn foreign_key(table: &str, column: &str) -> BackendError {
    BackendError::with_code(
        FOREIGN_KEY_VIOLATION,
        format!(
            "insert or update on table \"{}\" violates foreign key constraint on \"{}\"",
            table, column
        ),
    )
}

fn duplicate(table: &str) -> BackendError {
    BackendError::with_code(
        UNIQUE_VIOLATION,
        format!(
            "duplicate key value violates unique constraint \"{}_pkey\"",
            table
        ),
    )
}

#[derive(Clone)]
pub struct MemoryClient {
    store: MemoryStore,
    access_token: Option<String>,
}

#[async_trait]
impl Backend for MemoryClient {
    async fn list_profiles(&self) -> BackendResult<Vec<Profile>> {
        let mut profiles = self.store.tables().profiles.clone();
        profiles.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(profiles)
    }

    async fn list_skills(&self) -> BackendResult<Vec<Skill>> {
        let mut skills = self.store.tables().skills.clone();
        skills.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(skills)
    }

    async fn insert_profile_skill(&self, row: ProfileSkill) -> BackendResult<()> {
        let mut tables = self.store.tables();
        if !tables.profiles.iter().any(|p| p.id == row.profile_id) {
            return Err(foreign_key("profile_skills", "profile_id"));
        }
        if !tables.skills.iter().any(|s| s.id == row.skill_id) {
            return Err(foreign_key("profile_skills", "skill_id"));
        }
        if tables
            .profile_skills
            .iter()
            .any(|ps| ps.profile_id == row.profile_id && ps.skill_id == row.skill_id)
        {
            return Err(duplicate("profile_skills"));
        }
        tables.profile_skills.push(row);
        Ok(())
    }

    async fn list_vacancies(&self, filter: VacancyFilter) -> BackendResult<Vec<Vacancy>> {
        let mut vacancies: Vec<Vacancy> = self
            .store
            .tables()
            .vacancies
            .iter()
            .filter(|v| filter.vacancy_type.map_or(true, |t| v.vacancy_type == t))
            .filter(|v| filter.owner_id.map_or(true, |owner| v.owner_id == Some(owner)))
            .cloned()
            .collect();
        vacancies.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(vacancies)
    }

    async fn get_vacancy(&self, id: i64) -> BackendResult<Option<Vacancy>> {
        Ok(self.store.vacancy(id))
    }

    async fn insert_vacancy(&self, row: NewVacancy) -> BackendResult<Option<i64>> {
        let mut tables = self.store.tables();
        tables.next_vacancy_id += 1;
        let id = tables.next_vacancy_id;
        tables.vacancies.push(Vacancy {
            id,
            title: row.title,
            company_name: Some(row.company_name),
            description: row.description,
            status: Some(row.status),
            owner_id: Some(row.owner_id),
            created_at: Some(Utc::now()),
            vacancy_type: row.vacancy_type,
        });
        Ok(Some(id))
    }

    async fn update_vacancy_status(
        &self,
        id: i64,
        from: VacancyStatus,
        to: VacancyStatus,
    ) -> BackendResult<bool> {
        let mut tables = self.store.tables();
        match tables
            .vacancies
            .iter_mut()
            .find(|v| v.id == id && v.status == Some(from))
        {
            Some(vacancy) => {
                vacancy.status = Some(to);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_vacancy_skills(&self, vacancy_id: i64) -> BackendResult<Vec<AssignedVacancySkill>> {
        let tables = self.store.tables();
        let mut rows: Vec<AssignedVacancySkill> = tables
            .vacancy_skills
            .iter()
            .filter(|vs| vs.vacancy_id == vacancy_id)
            .map(|vs| AssignedVacancySkill {
                skill_id: vs.skill_id,
                required_proficiency_level: Some(vs.required_proficiency_level),
                is_mandatory: vs.is_mandatory,
                skills: tables
                    .skills
                    .iter()
                    .find(|s| s.id == vs.skill_id)
                    .map(|s| SkillName {
                        name: s.name.clone(),
                    }),
            })
            .collect();
        rows.sort_by_key(|row| row.skill_id);
        Ok(rows)
    }

    async fn insert_vacancy_skill(&self, row: VacancySkill) -> BackendResult<()> {
        let mut tables = self.store.tables();
        if !tables.vacancies.iter().any(|v| v.id == row.vacancy_id) {
            return Err(foreign_key("vacancy_skills", "vacancy_id"));
        }
        if !tables.skills.iter().any(|s| s.id == row.skill_id) {
            return Err(foreign_key("vacancy_skills", "skill_id"));
        }
        if tables
            .vacancy_skills
            .iter()
            .any(|vs| vs.vacancy_id == row.vacancy_id && vs.skill_id == row.skill_id)
        {
            return Err(duplicate("vacancy_skills"));
        }
        tables.vacancy_skills.push(row);
        Ok(())
    }

    async fn delete_vacancy_skill(&self, vacancy_id: i64, skill_id: i64) -> BackendResult<u64> {
        let mut tables = self.store.tables();
        let before = tables.vacancy_skills.len();
        tables
            .vacancy_skills
            .retain(|vs| !(vs.vacancy_id == vacancy_id && vs.skill_id == skill_id));
        Ok((before - tables.vacancy_skills.len()) as u64)
    }

    async fn get_user(&self) -> BackendResult<Option<SessionUser>> {
        let Some(token) = self.access_token.as_deref() else {
            return Ok(None);
        };
        let mut tables = self.store.tables();
        let Some(session) = tables.sessions.get(token).copied() else {
            return Ok(None);
        };
        if session.expires_at <= Utc::now() {
            tables.sessions.remove(token);
            return Ok(None);
        }
        let email = tables
            .accounts
            .iter()
            .find(|a| a.user_id == session.user_id)
            .map(|a| a.email.clone());
        Ok(Some(SessionUser {
            id: session.user_id,
            email,
        }))
    }

    async fn sign_out(&self) -> BackendResult<()> {
        if let Some(token) = self.access_token.as_deref() {
            self.store.tables().sessions.remove(token);
        }
        Ok(())
    }

    async fn sign_up(&self, account: NewAccount) -> BackendResult<()> {
        let mut tables = self.store.tables();
        let email = account.email.trim().to_lowercase();
        if tables.accounts.iter().any(|a| a.email == email) {
            return Err(BackendError::with_code(
                "user_already_exists",
                "User already registered",
            ));
        }
        let user_id = Uuid::new_v4();
        tables.accounts.push(Account {
            user_id,
            email,
            password: account.password,
        });
        tables.profiles.push(Profile {
            id: user_id,
            full_name: Some(account.full_name),
        });
        Ok(())
    }

    async fn sign_in_with_password(&self, email: String, password: String) -> BackendResult<Session> {
        let mut tables = self.store.tables();
        let email = email.trim().to_lowercase();
        let Some(account) = tables
            .accounts
            .iter()
            .find(|a| a.email == email && a.password == password)
            .cloned()
        else {
            return Err(BackendError::with_code(
                "invalid_credentials",
                "Invalid login credentials",
            ));
        };
        let token = tables.issue_session(account.user_id, Duration::seconds(SESSION_TTL_SECS));
        Ok(Session {
            access_token: token,
            expires_in: Some(SESSION_TTL_SECS),
            user: SessionUser {
                id: account.user_id,
                email: Some(account.email),
            },
        })
    }
}

#[derive(Clone)]
pub struct MemoryFactory {
    store: MemoryStore,
    session_cookie: String,
}

impl MemoryFactory {
    pub fn new(store: MemoryStore, session_cookie: impl Into<String>) -> Self {
        Self {
            store,
            session_cookie: session_cookie.into(),
        }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

impl ClientFactory for MemoryFactory {
    fn browser_client(&self) -> Arc<dyn Backend> {
        Arc::new(self.store.client(None))
    }

    fn server_client(&self, headers: &HeaderMap) -> Arc<dyn Backend> {
        Arc::new(
            self.store
                .client(session_token(headers, &self.session_cookie)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn profile_skill_pair_is_unique() {
        let store = MemoryStore::new();
        let profile = store.add_profile("Ana");
        let skill = store.add_skill("Rust");
        let client = store.client(None);
        let row = ProfileSkill {
            profile_id: profile.id,
            skill_id: skill.id,
            proficiency_level: 3,
            source_of_assessment: "test".into(),
        };

        client.insert_profile_skill(row.clone()).await.unwrap();
        let err = client.insert_profile_skill(row).await.unwrap_err();
        assert!(err.is_unique_violation());
        assert_eq!(store.profile_skills().len(), 1);
    }

    #[tokio::test]
    async fn unknown_skill_violates_foreign_key() {
        let store = MemoryStore::new();
        let profile = store.add_profile("Ana");
        let err = store
            .client(None)
            .insert_profile_skill(ProfileSkill {
                profile_id: profile.id,
                skill_id: 404,
                proficiency_level: 2,
                source_of_assessment: "test".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code.as_deref(), Some(FOREIGN_KEY_VIOLATION));
    }

    #[tokio::test]
    async fn vacancy_filter_and_ordering() {
        let store = MemoryStore::new();
        let client = store.client(None);
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        for (title, owner_id, vacancy_type) in [
            ("Mine", owner, VacancyType::Real),
            ("Theirs", other, VacancyType::Real),
            ("Template", owner, VacancyType::Template),
        ] {
            client
                .insert_vacancy(NewVacancy {
                    title: title.into(),
                    company_name: "Acme".into(),
                    description: None,
                    status: VacancyStatus::Open,
                    owner_id,
                    vacancy_type,
                })
                .await
                .unwrap();
        }

        let all = client.list_vacancies(VacancyFilter::default()).await.unwrap();
        let titles: Vec<_> = all.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, ["Template", "Theirs", "Mine"]);

        let mine_real = client
            .list_vacancies(VacancyFilter {
                vacancy_type: Some(VacancyType::Real),
                owner_id: Some(owner),
            })
            .await
            .unwrap();
        assert_eq!(mine_real.len(), 1);
        assert_eq!(mine_real[0].title, "Mine");
    }

    #[tokio::test]
    async fn status_update_is_conditional_on_current_status() {
        let store = MemoryStore::new();
        let client = store.client(None);
        let id = client
            .insert_vacancy(NewVacancy {
                title: "Ops".into(),
                company_name: "Acme".into(),
                description: None,
                status: VacancyStatus::Open,
                owner_id: Uuid::new_v4(),
                vacancy_type: VacancyType::Real,
            })
            .await
            .unwrap()
            .unwrap();

        assert!(!client
            .update_vacancy_status(id, VacancyStatus::Archived, VacancyStatus::Open)
            .await
            .unwrap());
        assert!(client
            .update_vacancy_status(id, VacancyStatus::Open, VacancyStatus::Archived)
            .await
            .unwrap());
        assert_eq!(store.vacancy(id).unwrap().status, Some(VacancyStatus::Archived));
    }

    #[tokio::test]
    async fn sign_in_issues_a_session_recognised_by_get_user() {
        let store = MemoryStore::new();
        let anon = store.client(None);
        anon.sign_up(NewAccount {
            full_name: "Carla".into(),
            email: "Carla@Example.com".into(),
            password: "secret1".into(),
        })
        .await
        .unwrap();

        let session = anon
            .sign_in_with_password("carla@example.com".into(), "secret1".into())
            .await
            .unwrap();
        let user = store
            .client(Some(session.access_token))
            .get_user()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id, session.user.id);
        assert!(anon.list_profiles().await.unwrap().iter().any(|p| p.id == user.id));

        let err = anon
            .sign_in_with_password("carla@example.com".into(), "wrong".into())
            .await
            .unwrap_err();
        assert_eq!(err.code.as_deref(), Some("invalid_credentials"));
    }

    #[tokio::test]
    async fn sign_out_revokes_the_token() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let token = store.open_session(user_id);
        let client = store.client(Some(token.clone()));
        assert!(client.get_user().await.unwrap().is_some());

        client.sign_out().await.unwrap();
        assert!(store.client(Some(token)).get_user().await.unwrap().is_none());
        assert_eq!(store.session_count(), 0);
    }

    #[tokio::test]
    async fn expired_sessions_resolve_to_no_user_and_are_pruned() {
        let store = MemoryStore::new();
        let stale = store.open_session_for(Uuid::new_v4(), Duration::seconds(-1));
        assert!(store
            .client(Some(stale.clone()))
            .get_user()
            .await
            .unwrap()
            .is_none());
        assert_eq!(store.session_count(), 0);

        store.open_session_for(Uuid::new_v4(), Duration::seconds(-1));
        let live = store.open_session(Uuid::new_v4());
        // Issuing a new token sweeps the lapsed one.
        assert_eq!(store.session_count(), 1);
        assert!(store.client(Some(live)).get_user().await.unwrap().is_some());
    }
}
