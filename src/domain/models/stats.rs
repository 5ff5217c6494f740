use serde::Serialize;

#[derive(Debug, Serialize, Default)]
pub struct UserStats {
    pub total: i64,
    pub donors: i64,
    pub charities: i64,
    pub admins: i64,
    pub banned: i64,
    pub dao_members: i64,
    pub dao_pending: i64,
}

#[derive(Debug, Serialize, Default)]
pub struct CharityStats {
    pub total: i64,
    pub pending: i64,
    pub verified: i64,
    pub rejected: i64,
}

#[derive(Debug, Serialize, Default)]
pub struct CampaignStats {
    pub total: i64,
    pub pending: i64,
    pub active: i64,
    pub rejected: i64,
    pub completed: i64,
    pub total_raised: f64,
}

#[derive(Debug, Serialize, Default)]
pub struct NewsStats {
    pub total: i64,
    pub published: i64,
}

#[derive(Debug, Serialize, Default)]
pub struct DashboardStats {
    pub users: UserStats,
    pub charities: CharityStats,
    pub campaigns: CampaignStats,
    pub votes: i64,
    pub news: NewsStats,
}
