pub mod backend;
pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;
pub mod views;

use std::sync::Arc;

use tracing::warn;

use crate::backend::{
    memory::{MemoryFactory, MemoryStore},
    supabase::SupabaseFactory,
    ClientFactory,
};
use crate::config::{BackendKind, Config};
use crate::error::Result;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub factory: Arc<dyn ClientFactory>,
}

impl AppState {
    pub fn new(config: Config, factory: Arc<dyn ClientFactory>) -> Self {
        Self { config, factory }
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let factory: Arc<dyn ClientFactory> = match config.backend {
            BackendKind::Supabase => Arc::new(SupabaseFactory::new(&config)?),
            BackendKind::Memory => {
                warn!("Using the in-memory backend; data is lost on restart");
                Arc::new(MemoryFactory::new(
                    MemoryStore::with_demo_data(),
                    config.session_cookie.clone(),
                ))
            }
        };
        Ok(Self::new(config, factory))
    }
}
