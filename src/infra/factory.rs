use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::{info, warn};
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::{AppState, Repositories};
use crate::domain::models::user::{User, UserRole};
use crate::domain::services::auth_service::{hash_password, normalize_email};
use crate::error::AppError;
use crate::infra::repositories::{
    postgres_auth_repo::PostgresAuthRepo, postgres_campaign_repo::PostgresCampaignRepo,
    postgres_charity_repo::PostgresCharityRepo, postgres_financial_report_repo::PostgresFinancialReportRepo,
    postgres_news_repo::PostgresNewsRepo, postgres_user_repo::PostgresUserRepo,
    postgres_vote_repo::PostgresVoteRepo,
    sqlite_auth_repo::SqliteAuthRepo, sqlite_campaign_repo::SqliteCampaignRepo,
    sqlite_charity_repo::SqliteCharityRepo, sqlite_financial_report_repo::SqliteFinancialReportRepo,
    sqlite_news_repo::SqliteNewsRepo, sqlite_user_repo::SqliteUserRepo,
    sqlite_vote_repo::SqliteVoteRepo,
};

pub fn sqlite_repositories(pool: SqlitePool) -> Repositories {
    Repositories {
        users: Arc::new(SqliteUserRepo::new(pool.clone())),
        auth: Arc::new(SqliteAuthRepo::new(pool.clone())),
        charities: Arc::new(SqliteCharityRepo::new(pool.clone())),
        campaigns: Arc::new(SqliteCampaignRepo::new(pool.clone())),
        reports: Arc::new(SqliteFinancialReportRepo::new(pool.clone())),
        votes: Arc::new(SqliteVoteRepo::new(pool.clone())),
        news: Arc::new(SqliteNewsRepo::new(pool)),
    }
}

pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        users: Arc::new(PostgresUserRepo::new(pool.clone())),
        auth: Arc::new(PostgresAuthRepo::new(pool.clone())),
        charities: Arc::new(PostgresCharityRepo::new(pool.clone())),
        campaigns: Arc::new(PostgresCampaignRepo::new(pool.clone())),
        reports: Arc::new(PostgresFinancialReportRepo::new(pool.clone())),
        votes: Arc::new(PostgresVoteRepo::new(pool.clone())),
        news: Arc::new(PostgresNewsRepo::new(pool)),
    }
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let repos = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        postgres_repositories(pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        sqlite_repositories(pool)
    };

    let state = AppState::new(config.clone(), repos);
    if let Err(e) = seed_admin(&state).await {
        warn!("Admin bootstrap failed: {}", e);
    }
    state
}

/// Creates the configured administrator account once, if both
/// `ADMIN_EMAIL` and `ADMIN_PASSWORD` are set.
pub async fn seed_admin(state: &AppState) -> Result<Option<User>, AppError> {
    let (Some(email), Some(password)) = (&state.config.admin_email, &state.config.admin_password) else {
        return Ok(None);
    };

    let email = normalize_email(email);
    if state.user_repo.find_by_email(&email).await?.is_some() {
        info!("Admin account {} already present", email);
        return Ok(None);
    }

    let admin = User::new("Administrator".to_string(), email, None, hash_password(password)?, UserRole::Admin);
    let created = state.user_repo.create(&admin).await?;
    info!("Bootstrapped admin account {}", created.email);
    Ok(Some(created))
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
