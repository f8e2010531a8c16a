//! Dashboard actions on subscriptions.

use std::sync::Arc;

use log::debug;
use log::info;

use crate::api::SubscriptionApi;
use crate::entity::ApprovalOutcome;
use crate::entity::CancellationStatus;
use crate::entity::Decision;
use crate::entity::Subscription;
use crate::entity::SubscriptionId;
use crate::service::error::ServiceError;
use crate::service::require_session;
use crate::session::SessionStore;
use crate::task::busy::BusyMarker;
use crate::task::cancellation_poller::CancellationPoller;
use crate::task::cancellation_poller::PollOutcome;

/// A decision and the subscription list reloaded after it.
#[derive(Clone, Debug)]
pub struct DecisionResult {
    pub outcome: ApprovalOutcome,
    pub subscriptions: Vec<Subscription>,
}

pub struct SubscriptionService {
    api: Arc<dyn SubscriptionApi>,
    session: Arc<dyn SessionStore>,
    busy: BusyMarker,
    poller: CancellationPoller,
    upcoming_days: u32,
}

impl SubscriptionService {
    pub fn new(
        api: Arc<dyn SubscriptionApi>,
        session: Arc<dyn SessionStore>,
        busy: BusyMarker,
        poller: CancellationPoller,
        upcoming_days: u32,
    ) -> Self {
        Self {
            api,
            session,
            busy,
            poller,
            upcoming_days,
        }
    }

    pub fn busy(&self) -> &BusyMarker {
        &self.busy
    }

    pub fn default_upcoming_days(&self) -> u32 {
        self.upcoming_days
    }

    pub async fn list(&self) -> Result<Vec<Subscription>, ServiceError> {
        require_session(self.session.as_ref())?;
        Ok(self.api.list_subscriptions().await?)
    }

    /// Renewals due within `days`, or the configured window when `None`.
    pub async fn upcoming(&self, days: Option<u32>) -> Result<Vec<Subscription>, ServiceError> {
        require_session(self.session.as_ref())?;
        let days = days.unwrap_or(self.upcoming_days);
        debug!("Fetching renewals due within {days} days");
        Ok(self.api.upcoming_subscriptions(days).await?)
    }

    /// Rescans bank transactions, then reloads the list.
    pub async fn rescan(&self) -> Result<Vec<Subscription>, ServiceError> {
        require_session(self.session.as_ref())?;
        let found = self.api.scan().await?;
        info!("Rescan returned {} subscription(s).", found.len());
        Ok(self.api.list_subscriptions().await?)
    }

    /// Approves or denies the pending renewal of `id`, then reloads the list.
    pub async fn decide(
        &self,
        id: SubscriptionId,
        decision: Decision,
    ) -> Result<DecisionResult, ServiceError> {
        require_session(self.session.as_ref())?;
        let Some(_guard) = self.busy.acquire(id) else {
            return Err(ServiceError::Busy { id });
        };

        let outcome = self.api.decide(id, decision).await?;
        info!("Recorded `{decision}` for subscription {id}.");
        if outcome.cancel_started {
            info!("Server started cancelling subscription {id}.");
        }
        let subscriptions = self.api.list_subscriptions().await?;

        Ok(DecisionResult {
            outcome,
            subscriptions,
        })
    }

    pub async fn cancellation_status(
        &self,
        id: SubscriptionId,
    ) -> Result<CancellationStatus, ServiceError> {
        require_session(self.session.as_ref())?;
        Ok(self.api.cancellation_status(id).await?)
    }

    /// Starts cancelling `id` and waits for the server to finish it.
    pub async fn cancel(&self, id: SubscriptionId) -> Result<PollOutcome, ServiceError> {
        require_session(self.session.as_ref())?;
        self.poller.cancel(id).await
    }
}
