//! HTTP client for the DonaTrust API.
//!
//! `ApiClient` owns the transport and the bearer-token lifecycle; the
//! resource wrappers (`CampaignsApi`, `UsersApi`) only shape requests.

pub mod api_client;
pub mod campaigns;
pub mod error;
pub mod session;
pub mod users;

pub use api_client::{ApiClient, RegisterParams, REQUEST_TIMEOUT};
pub use campaigns::{
    CampaignChanges, CampaignDetailView, CampaignListParams, CampaignPage, CampaignView, CampaignsApi,
    CategoryView, NewCampaign,
};
pub use error::ClientError;
pub use session::{JsonFileStorage, MemoryStorage, Session, SessionData, SessionStorage, SessionUser};
pub use users::{Account, ProfileChanges, UsersApi};
