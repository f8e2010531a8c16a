//! Bank linking through the aggregator.
//!
//! The bank-link widget itself runs outside this crate: it is opened with the
//! link token from [`BankLinkService::link_token`] and hands back a public
//! token, which [`BankLinkService::exchange`] turns into a stored connection.

use std::sync::Arc;

use log::info;

use crate::api::SubscriptionApi;
use crate::entity::LinkToken;
use crate::entity::Subscription;
use crate::service::error::ServiceError;
use crate::service::require_session;
use crate::session::SessionStore;

pub struct BankLinkService {
    api: Arc<dyn SubscriptionApi>,
    session: Arc<dyn SessionStore>,
}

impl BankLinkService {
    pub fn new(api: Arc<dyn SubscriptionApi>, session: Arc<dyn SessionStore>) -> Self {
        Self { api, session }
    }

    pub async fn link_token(&self) -> Result<LinkToken, ServiceError> {
        require_session(self.session.as_ref())?;
        Ok(self.api.create_link_token().await?)
    }

    /// Exchanges the widget's public token, then rescans transactions.
    ///
    /// Returns the subscriptions found by the rescan.
    pub async fn exchange(&self, public_token: &str) -> Result<Vec<Subscription>, ServiceError> {
        require_session(self.session.as_ref())?;
        let public_token = public_token.trim();
        if public_token.is_empty() {
            return Err(ServiceError::UnexpectedResult {
                message: "Public token is empty".to_string(),
            });
        }

        let result = self.api.exchange_public_token(public_token).await?;
        info!("Bank connection {}; rescanning transactions.", result.status);
        Ok(self.api.scan().await?)
    }
}
