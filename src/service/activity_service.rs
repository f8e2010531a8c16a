use std::sync::Arc;

use crate::api::SubscriptionApi;
use crate::entity::ActivityEvent;
use crate::service::error::ServiceError;
use crate::service::require_session;
use crate::session::SessionStore;

pub struct ActivityService {
    api: Arc<dyn SubscriptionApi>,
    session: Arc<dyn SessionStore>,
}

impl ActivityService {
    pub fn new(api: Arc<dyn SubscriptionApi>, session: Arc<dyn SessionStore>) -> Self {
        Self { api, session }
    }

    /// The account's audit log, newest first.
    pub async fn events(&self) -> Result<Vec<ActivityEvent>, ServiceError> {
        require_session(self.session.as_ref())?;
        Ok(self.api.events().await?)
    }
}
