use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated caller as reported by the auth subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub user: SessionUser,
}

/// Registration data handed to the auth subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub full_name: String,
    pub email: String,
    pub password: String,
}
