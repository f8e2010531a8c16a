//! Sign-up, log-in and log-out.

use std::sync::Arc;

use log::info;

use crate::api::SubscriptionApi;
use crate::entity::AccessToken;
use crate::entity::Credentials;
use crate::service::error::ServiceError;
use crate::session::SessionStore;

pub struct AuthService {
    api: Arc<dyn SubscriptionApi>,
    session: Arc<dyn SessionStore>,
}

impl AuthService {
    pub fn new(api: Arc<dyn SubscriptionApi>, session: Arc<dyn SessionStore>) -> Self {
        Self { api, session }
    }

    pub async fn signup(&self, credentials: &Credentials) -> Result<(), ServiceError> {
        let token = self.api.signup(credentials).await?;
        self.store(token)?;
        info!("Signed up as {}.", credentials.email);
        Ok(())
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<(), ServiceError> {
        let token = self.api.login(credentials).await?;
        self.store(token)?;
        info!("Logged in as {}.", credentials.email);
        Ok(())
    }

    pub fn logout(&self) -> Result<(), ServiceError> {
        self.session.clear()?;
        info!("Logged out.");
        Ok(())
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_signed_in()
    }

    fn store(&self, token: AccessToken) -> Result<(), ServiceError> {
        if token.access_token.trim().is_empty() {
            return Err(ServiceError::UnexpectedResult {
                message: "Server returned an empty access token".to_string(),
            });
        }
        self.session.set(&token.access_token)?;
        Ok(())
    }
}
