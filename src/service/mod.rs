use std::sync::Arc;

use crate::api::HttpApiClient;
use crate::api::SubscriptionApi;
use crate::config::Config;
use crate::service::activity_service::ActivityService;
use crate::service::auth_service::AuthService;
use crate::service::bank_link_service::BankLinkService;
use crate::service::error::ServiceError;
use crate::service::subscription_service::SubscriptionService;
use crate::session::SessionStore;
use crate::task::busy::BusyMarker;
use crate::task::cancellation_poller::CancellationPoller;
use crate::task::cancellation_poller::PollPolicy;

pub mod activity_service;
pub mod auth_service;
pub mod bank_link_service;
pub mod error;
pub mod subscription_service;

pub struct Services {
    pub auth: Arc<AuthService>,
    pub subscriptions: Arc<SubscriptionService>,
    pub bank_link: Arc<BankLinkService>,
    pub activity: Arc<ActivityService>,
}

impl Services {
    /// Wires every service to an HTTP client for `config.api_base`.
    pub fn new(config: &Config, session: Arc<dyn SessionStore>) -> Result<Self, ServiceError> {
        let api: Arc<dyn SubscriptionApi> =
            Arc::new(HttpApiClient::new(&config.api_base, session.clone())?);
        Ok(Self::with_api(
            api,
            session,
            PollPolicy::from_config(config),
            config.upcoming_days,
        ))
    }

    pub fn with_api(
        api: Arc<dyn SubscriptionApi>,
        session: Arc<dyn SessionStore>,
        policy: PollPolicy,
        upcoming_days: u32,
    ) -> Self {
        let busy = BusyMarker::new();
        let poller = CancellationPoller::new(api.clone(), busy.clone(), policy);

        Self {
            auth: Arc::new(AuthService::new(api.clone(), session.clone())),
            subscriptions: Arc::new(SubscriptionService::new(
                api.clone(),
                session.clone(),
                busy,
                poller,
                upcoming_days,
            )),
            bank_link: Arc::new(BankLinkService::new(api.clone(), session.clone())),
            activity: Arc::new(ActivityService::new(api, session)),
        }
    }
}

/// Fails without touching the network when there is no session token.
pub(crate) fn require_session(session: &dyn SessionStore) -> Result<(), ServiceError> {
    if session.is_signed_in() {
        Ok(())
    } else {
        Err(ServiceError::NotSignedIn)
    }
}
