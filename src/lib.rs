pub mod api;
pub mod config;
pub mod db;
pub mod notifications;
pub mod tokens;
pub mod ui;

pub use db::DbPool;

use config::Config;
use notifications::Mailer;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(config: Config, db: DbPool, mailer: Arc<dyn Mailer>) -> Self {
        Self { config, db, mailer }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::notifications::mock::MockMailer;

    pub async fn test_state_with_mailer(mailer: Arc<dyn Mailer>) -> Arc<AppState> {
        let db = crate::db::test_pool().await;
        let mut config = Config::default();
        config.auth.secret_key = "test-secret".to_string();
        config.server.public_url = "http://localhost:8080".to_string();
        Arc::new(AppState::new(config, db, mailer))
    }

    pub async fn test_state() -> Arc<AppState> {
        test_state_with_mailer(Arc::new(MockMailer::new())).await
    }

    pub async fn insert_user(
        pool: &DbPool,
        id: &str,
        username: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) {
        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await
        .expect("failed to insert test user");
    }
}
