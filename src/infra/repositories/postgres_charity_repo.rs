use crate::domain::{
    models::{charity::{Charity, CharityFilter}, pagination::Paginated},
    ports::{CharityRepository, DUPLICATE_CHARITY_MSG, DUPLICATE_LICENSE_MSG},
};
use crate::error::{is_unique_violation, AppError};
use super::{like_pattern, unique_conflict, LIKE_ESCAPE};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{error, warn};

const CHARITY_COLUMNS: &str = "id, user_id, name, description, mission, license_number, address, city, phone, email, website, logo_url, bank_account, verification_documents, verification_status, rejection_reason, verified_at, created_at, updated_at";

pub struct PostgresCharityRepo {
    pool: PgPool,
}

impl PostgresCharityRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Postgres>, filter: &CharityFilter) {
    qb.push(" WHERE 1 = 1");
    if let Some(status) = filter.verification_status {
        qb.push(" AND verification_status = ").push_bind(status.as_str());
    }
    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(LIKE_ESCAPE)
            .push(" OR description ILIKE ")
            .push_bind(pattern.clone())
            .push(LIKE_ESCAPE)
            .push(" OR mission ILIKE ")
            .push_bind(pattern)
            .push(LIKE_ESCAPE)
            .push(")");
    }
    if let Some(city) = &filter.city {
        qb.push(" AND city = ").push_bind(city.clone());
    }
}

#[async_trait]
impl CharityRepository for PostgresCharityRepo {
    async fn register(&self, charity: &Charity) -> Result<Charity, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let owned: Option<String> = sqlx::query_scalar("SELECT id FROM charities WHERE user_id = $1")
            .bind(&charity.user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if owned.is_some() {
            return Err(AppError::Conflict(DUPLICATE_CHARITY_MSG.into()));
        }

        if let Some(license) = &charity.license_number {
            let taken: Option<String> = sqlx::query_scalar("SELECT id FROM charities WHERE license_number = $1")
                .bind(license)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            if taken.is_some() {
                return Err(AppError::Conflict(DUPLICATE_LICENSE_MSG.into()));
            }
        }

        let created = sqlx::query_as::<_, Charity>(&format!(
            "INSERT INTO charities ({CHARITY_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19) RETURNING {CHARITY_COLUMNS}"
        ))
            .bind(&charity.id)
            .bind(&charity.user_id)
            .bind(&charity.name)
            .bind(&charity.description)
            .bind(&charity.mission)
            .bind(&charity.license_number)
            .bind(&charity.address)
            .bind(&charity.city)
            .bind(&charity.phone)
            .bind(&charity.email)
            .bind(&charity.website)
            .bind(&charity.logo_url)
            .bind(&charity.bank_account)
            .bind(&charity.verification_documents)
            .bind(charity.verification_status.as_str())
            .bind(&charity.rejection_reason)
            .bind(charity.verified_at)
            .bind(charity.created_at)
            .bind(charity.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    warn!("Concurrent charity registration rejected by unique constraint");
                }
                unique_conflict(e)
            })?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Charity>, AppError> {
        sqlx::query_as::<_, Charity>(&format!("SELECT {CHARITY_COLUMNS} FROM charities WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Option<Charity>, AppError> {
        sqlx::query_as::<_, Charity>(&format!("SELECT {CHARITY_COLUMNS} FROM charities WHERE user_id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_license(&self, license_number: &str, excluding_id: Option<&str>) -> Result<Option<Charity>, AppError> {
        sqlx::query_as::<_, Charity>(&format!(
            "SELECT {CHARITY_COLUMNS} FROM charities WHERE license_number = $1 AND ($2 IS NULL OR id <> $3)"
        ))
            .bind(license_number)
            .bind(excluding_id)
            .bind(excluding_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, charity: &Charity) -> Result<Charity, AppError> {
        sqlx::query_as::<_, Charity>(&format!(
            "UPDATE charities SET name = $1, description = $2, mission = $3, license_number = $4, address = $5, city = $6, phone = $7, email = $8, website = $9, logo_url = $10, bank_account = $11, verification_documents = $12, verification_status = $13, rejection_reason = $14, verified_at = $15, updated_at = $16
             WHERE id = $17 RETURNING {CHARITY_COLUMNS}"
        ))
            .bind(&charity.name)
            .bind(&charity.description)
            .bind(&charity.mission)
            .bind(&charity.license_number)
            .bind(&charity.address)
            .bind(&charity.city)
            .bind(&charity.phone)
            .bind(&charity.email)
            .bind(&charity.website)
            .bind(&charity.logo_url)
            .bind(&charity.bank_account)
            .bind(&charity.verification_documents)
            .bind(charity.verification_status.as_str())
            .bind(&charity.rejection_reason)
            .bind(charity.verified_at)
            .bind(charity.updated_at)
            .bind(&charity.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if !is_unique_violation(&e) {
                    error!("Postgres Charity Update Failed: {:?}", e);
                }
                unique_conflict(e)
            })?
            .ok_or(AppError::NotFound("Charity not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM charities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Postgres Charity Deletion Failed: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Charity not found".into()));
        }
        Ok(())
    }

    async fn list(&self, filter: &CharityFilter) -> Result<Paginated<Charity>, AppError> {
        let total = self.count(filter).await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {CHARITY_COLUMNS} FROM charities"));
        push_filters(&mut qb, filter);
        qb.push(format!(" ORDER BY {} {}, id ASC LIMIT ", filter.sort.as_str(), filter.order.as_str()))
            .push_bind(filter.page.limit as i64)
            .push(" OFFSET ")
            .push_bind(filter.page.offset());

        let charities = qb.build_query_as::<Charity>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(Paginated::new(charities, total, filter.page))
    }

    async fn count(&self, filter: &CharityFilter) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM charities");
        push_filters(&mut qb, filter);
        qb.build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
