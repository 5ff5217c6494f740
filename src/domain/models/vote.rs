use serde::Serialize;
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

string_enum!(VoteDecision {
    Approve => "approve",
    Reject => "reject",
});

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct Vote {
    pub id: String,
    pub user_id: String,
    pub target_id: String,
    #[sqlx(try_from = "String")]
    pub decision: VoteDecision,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(user_id: String, target_id: String, decision: VoteDecision) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            target_id,
            decision,
            created_at: Utc::now(),
        }
    }
}
