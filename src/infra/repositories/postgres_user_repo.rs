use crate::domain::{
    models::{pagination::Paginated, user::{User, UserFilter}},
    ports::UserRepository,
};
use crate::error::AppError;
use super::{like_pattern, LIKE_ESCAPE};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::error;

const USER_COLUMNS: &str = "id, full_name, email, phone, password_hash, role, status, dao_status, avatar_url, address, created_at, updated_at";

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Postgres>, filter: &UserFilter) {
    qb.push(" WHERE 1 = 1");
    if let Some(role) = filter.role {
        qb.push(" AND role = ").push_bind(role.as_str());
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(dao_status) = filter.dao_status {
        qb.push(" AND dao_status = ").push_bind(dao_status.as_str());
    }
    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        qb.push(" AND (full_name ILIKE ")
            .push_bind(pattern.clone())
            .push(LIKE_ESCAPE)
            .push(" OR email ILIKE ")
            .push_bind(pattern)
            .push(LIKE_ESCAPE)
            .push(")");
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepo {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING {USER_COLUMNS}"
        ))
            .bind(&user.id)
            .bind(&user.full_name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.status.as_str())
            .bind(user.dao_status.as_str())
            .bind(&user.avatar_url)
            .bind(&user.address)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET full_name = $1, phone = $2, password_hash = $3, role = $4, status = $5, dao_status = $6, avatar_url = $7, address = $8, updated_at = $9
             WHERE id = $10 RETURNING {USER_COLUMNS}"
        ))
            .bind(&user.full_name)
            .bind(&user.phone)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.status.as_str())
            .bind(user.dao_status.as_str())
            .bind(&user.avatar_url)
            .bind(&user.address)
            .bind(user.updated_at)
            .bind(&user.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Postgres User Update Failed: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or(AppError::NotFound("User not found".into()))
    }

    async fn list(&self, filter: &UserFilter) -> Result<Paginated<User>, AppError> {
        let total = self.count(filter).await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users"));
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id ASC LIMIT ")
            .push_bind(filter.page.limit as i64)
            .push(" OFFSET ")
            .push_bind(filter.page.offset());

        let users = qb.build_query_as::<User>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(Paginated::new(users, total, filter.page))
    }

    async fn count(&self, filter: &UserFilter) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
        push_filters(&mut qb, filter);
        qb.build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
