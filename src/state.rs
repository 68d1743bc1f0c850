use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::SessionManager;
use crate::services::{Services, Transport};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub services: Services,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    pub fn new(db: SqlitePool, sessions: SessionManager) -> Self {
        Self {
            services: Services::new(Transport::Server(db.clone())),
            db,
            sessions: Arc::new(sessions),
        }
    }
}
