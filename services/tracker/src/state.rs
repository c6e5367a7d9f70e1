//! Application state shared across handlers

use sqlx::PgPool;

use crate::{
    ai::AiService,
    config::ServerConfig,
    jwt::JwtService,
    repositories::{IssueRepository, UserRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: ServerConfig,
    pub jwt_service: JwtService,
    pub ai_service: AiService,
    pub user_repository: UserRepository,
    pub issue_repository: IssueRepository,
}

impl AppState {
    /// Wire the repositories onto `pool`
    pub fn new(
        pool: PgPool,
        config: ServerConfig,
        jwt_service: JwtService,
        ai_service: AiService,
    ) -> Self {
        Self {
            user_repository: UserRepository::new(pool.clone()),
            issue_repository: IssueRepository::new(pool.clone()),
            db_pool: pool,
            config,
            jwt_service,
            ai_service,
        }
    }
}
