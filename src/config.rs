use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

pub const DEFAULT_SESSION_COOKIE: &str = "talentsync-access-token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Supabase,
    Memory,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supabase" => Ok(BackendKind::Supabase),
            "memory" => Ok(BackendKind::Memory),
            other => Err(format!("unknown backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub backend: BackendKind,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: Option<String>,
    pub session_cookie: String,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let backend = get_env_parse_or("BACKEND", BackendKind::Supabase)?;
        let (supabase_url, supabase_anon_key) = match backend {
            BackendKind::Supabase => {
                let raw = get_env("SUPABASE_URL")?;
                url::Url::parse(&raw).map_err(|e| {
                    Error::Config(format!("Invalid value for SUPABASE_URL: {}", e))
                })?;
                (raw, get_env("SUPABASE_ANON_KEY")?)
            }
            BackendKind::Memory => (
                env::var("SUPABASE_URL").unwrap_or_default(),
                env::var("SUPABASE_ANON_KEY").unwrap_or_default(),
            ),
        };

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            backend,
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            supabase_anon_key,
            supabase_jwt_secret: get_env_opt("SUPABASE_JWT_SECRET"),
            session_cookie: get_env_opt("SESSION_COOKIE")
                .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string()),
            log_format: get_env_parse_or("LOG_FORMAT", LogFormat::Text)?,
        })
    }

    /// Configuration for an in-process backend, used by tests and local runs.
    pub fn memory(server_address: impl Into<String>) -> Self {
        Self {
            server_address: server_address.into(),
            backend: BackendKind::Memory,
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            supabase_jwt_secret: None,
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            log_format: LogFormat::Text,
        }
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_opt(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_kind_parses_case_insensitively() {
        assert_eq!("Memory".parse::<BackendKind>(), Ok(BackendKind::Memory));
        assert_eq!(" supabase ".parse::<BackendKind>(), Ok(BackendKind::Supabase));
        assert!("postgres".parse::<BackendKind>().is_err());
    }

    #[test]
    fn log_format_rejects_unknown_values() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert!("yaml".parse::<LogFormat>().is_err());
    }
}
