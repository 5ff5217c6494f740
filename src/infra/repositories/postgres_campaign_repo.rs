use crate::domain::{
    models::{
        campaign::{Campaign, CampaignFilter, CampaignUpdate},
        charity::VerificationStatus,
        pagination::Paginated,
    },
    ports::CampaignRepository,
};
use crate::error::AppError;
use super::{like_pattern, LIKE_ESCAPE};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::error;

const CAMPAIGN_COLUMNS: &str = "id, charity_id, title, description, goal_amount, current_amount, start_date, end_date, category, image_url, featured, status, rejection_reason, approved_at, created_at, updated_at";

pub struct PostgresCampaignRepo {
    pool: PgPool,
}

impl PostgresCampaignRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Postgres>, filter: &CampaignFilter) {
    qb.push(" WHERE 1 = 1");
    if let Some(search) = &filter.search {
        qb.push(" AND title ILIKE ").push_bind(like_pattern(search)).push(LIKE_ESCAPE);
    }
    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(charity_id) = &filter.charity_id {
        qb.push(" AND charity_id = ").push_bind(charity_id.clone());
    }
    if let Some(featured) = filter.featured {
        qb.push(" AND featured = ").push_bind(featured);
    }
    if filter.verified_charities_only {
        qb.push(" AND charity_id IN (SELECT id FROM charities WHERE verification_status = ")
            .push_bind(VerificationStatus::Verified.as_str())
            .push(")");
    }
}

#[async_trait]
impl CampaignRepository for PostgresCampaignRepo {
    async fn create(&self, campaign: &Campaign) -> Result<Campaign, AppError> {
        sqlx::query_as::<_, Campaign>(&format!(
            "INSERT INTO campaigns ({CAMPAIGN_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) RETURNING {CAMPAIGN_COLUMNS}"
        ))
            .bind(&campaign.id)
            .bind(&campaign.charity_id)
            .bind(&campaign.title)
            .bind(&campaign.description)
            .bind(campaign.goal_amount)
            .bind(campaign.current_amount)
            .bind(campaign.start_date)
            .bind(campaign.end_date)
            .bind(&campaign.category)
            .bind(&campaign.image_url)
            .bind(campaign.featured)
            .bind(campaign.status.as_str())
            .bind(&campaign.rejection_reason)
            .bind(campaign.approved_at)
            .bind(campaign.created_at)
            .bind(campaign.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Campaign>, AppError> {
        sqlx::query_as::<_, Campaign>(&format!("SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, campaign: &Campaign) -> Result<Campaign, AppError> {
        sqlx::query_as::<_, Campaign>(&format!(
            "UPDATE campaigns SET title = $1, description = $2, goal_amount = $3, current_amount = $4, start_date = $5, end_date = $6, category = $7, image_url = $8, featured = $9, status = $10, rejection_reason = $11, approved_at = $12, updated_at = $13
             WHERE id = $14 RETURNING {CAMPAIGN_COLUMNS}"
        ))
            .bind(&campaign.title)
            .bind(&campaign.description)
            .bind(campaign.goal_amount)
            .bind(campaign.current_amount)
            .bind(campaign.start_date)
            .bind(campaign.end_date)
            .bind(&campaign.category)
            .bind(&campaign.image_url)
            .bind(campaign.featured)
            .bind(campaign.status.as_str())
            .bind(&campaign.rejection_reason)
            .bind(campaign.approved_at)
            .bind(campaign.updated_at)
            .bind(&campaign.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Postgres Campaign Update Failed: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or(AppError::NotFound("Campaign not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Campaign not found".into()));
        }
        Ok(())
    }

    async fn list(&self, filter: &CampaignFilter) -> Result<Paginated<Campaign>, AppError> {
        let total = self.count(filter).await?;

        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {CAMPAIGN_COLUMNS} FROM campaigns"));
        push_filters(&mut qb, filter);
        qb.push(format!(" ORDER BY {} {}, id ASC LIMIT ", filter.sort.as_str(), filter.order.as_str()))
            .push_bind(filter.page.limit as i64)
            .push(" OFFSET ")
            .push_bind(filter.page.offset());

        let campaigns = qb.build_query_as::<Campaign>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(Paginated::new(campaigns, total, filter.page))
    }

    async fn count(&self, filter: &CampaignFilter) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM campaigns");
        push_filters(&mut qb, filter);
        qb.build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_charity(&self, charity_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM campaigns WHERE charity_id = $1")
            .bind(charity_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn total_raised(&self) -> Result<f64, AppError> {
        sqlx::query_scalar::<_, f64>("SELECT COALESCE(SUM(current_amount), 0)::DOUBLE PRECISION FROM campaigns")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn add_update(&self, update: &CampaignUpdate) -> Result<CampaignUpdate, AppError> {
        sqlx::query_as::<_, CampaignUpdate>(
            "INSERT INTO campaign_updates (id, campaign_id, title, content, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING id, campaign_id, title, content, created_at"
        )
            .bind(&update.id)
            .bind(&update.campaign_id)
            .bind(&update.title)
            .bind(&update.content)
            .bind(update.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_updates(&self, campaign_id: &str) -> Result<Vec<CampaignUpdate>, AppError> {
        sqlx::query_as::<_, CampaignUpdate>(
            "SELECT id, campaign_id, title, content, created_at FROM campaign_updates WHERE campaign_id = $1 ORDER BY created_at DESC"
        )
            .bind(campaign_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
