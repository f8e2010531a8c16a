//! Client side of the Approval HTTP/JSON API.

use async_trait::async_trait;

use crate::api::error::ApiError;
use crate::entity::AccessToken;
use crate::entity::ActivityEvent;
use crate::entity::ApprovalOutcome;
use crate::entity::CancellationStarted;
use crate::entity::CancellationStatus;
use crate::entity::Credentials;
use crate::entity::Decision;
use crate::entity::ExchangeResult;
use crate::entity::LinkToken;
use crate::entity::Subscription;
use crate::entity::SubscriptionId;

pub mod error;
pub mod http_client;

pub use http_client::HttpApiClient;

/// Every call the client makes to the server.
///
/// Implementations attach the session's bearer token themselves.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionApi: Send + Sync {
    /// `POST /auth/signup`
    async fn signup(&self, credentials: &Credentials) -> Result<AccessToken, ApiError>;

    /// `POST /auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<AccessToken, ApiError>;

    /// `GET /subscriptions`
    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, ApiError>;

    /// `GET /subscriptions/upcoming?days=N`
    async fn upcoming_subscriptions(&self, days: u32) -> Result<Vec<Subscription>, ApiError>;

    /// `POST /subscriptions/scan_real`
    async fn scan(&self) -> Result<Vec<Subscription>, ApiError>;

    /// `POST /approvals`
    async fn decide(
        &self,
        id: SubscriptionId,
        decision: Decision,
    ) -> Result<ApprovalOutcome, ApiError>;

    /// `POST /cancellations/start`
    async fn start_cancellation(&self, id: SubscriptionId)
    -> Result<CancellationStarted, ApiError>;

    /// `GET /cancellations/status/{id}`
    async fn cancellation_status(&self, id: SubscriptionId)
    -> Result<CancellationStatus, ApiError>;

    /// `POST /plaid/link_token`
    async fn create_link_token(&self) -> Result<LinkToken, ApiError>;

    /// `POST /plaid/exchange`
    async fn exchange_public_token(&self, public_token: &str) -> Result<ExchangeResult, ApiError>;

    /// `GET /events/`
    async fn events(&self) -> Result<Vec<ActivityEvent>, ApiError>;
}
