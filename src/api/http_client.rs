//! [`SubscriptionApi`] over HTTP.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use wreq::Client;
use wreq::header::ACCEPT;
use wreq::header::AUTHORIZATION;
use wreq::header::CONTENT_TYPE;
use wreq::header::HeaderMap;
use wreq::header::HeaderValue;
use wreq::header::USER_AGENT;

use crate::api::SubscriptionApi;
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
use crate::entity::action::ApprovalRequest;
use crate::entity::action::CancellationRequest;
use crate::entity::action::PublicTokenExchange;
use crate::entity::normalize::normalize_collection;
use crate::session::SessionStore;

pub struct HttpApiClient {
    /// e.g. `https://approval-v2.onrender.com`, without a trailing slash
    pub base_url: String,
    client: Client,
    session: Arc<dyn SessionStore>,
}

impl HttpApiClient {
    pub fn new(base_url: &str, session: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("approval/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Adds the JSON content type and, when signed in, the bearer token.
    fn authorize(&self, request: wreq::RequestBuilder) -> wreq::RequestBuilder {
        let request = request.header(CONTENT_TYPE, "application/json");
        match self.session.get() {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn send(&self, request: wreq::RequestBuilder) -> Result<String, ApiError> {
        let req = self.authorize(request).build()?;
        debug!("Making {} request to: {}", req.method(), req.url());
        let response = self.client.execute(req).await?;

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read response body: {e}");
                String::new()
            }
        };

        if !status.is_success() {
            debug!("Request failed with status {status}: {body}");
            return Err(ApiError::from_response(
                status.as_u16(),
                status.canonical_reason(),
                &body,
            ));
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: wreq::RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(self.client.get(self.url(path))).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.body(serde_json::to_string(body)?);
        }
        self.send_json(request).await
    }
}

#[async_trait]
impl SubscriptionApi for HttpApiClient {
    async fn signup(&self, credentials: &Credentials) -> Result<AccessToken, ApiError> {
        debug!("Signing up {}", credentials.email);
        self.post_json("/auth/signup", Some(credentials)).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<AccessToken, ApiError> {
        debug!("Logging in {}", credentials.email);
        self.post_json("/auth/login", Some(credentials)).await
    }

    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, ApiError> {
        let body: Value = self.get_json("/subscriptions").await?;
        Ok(normalize_collection(body))
    }

    async fn upcoming_subscriptions(&self, days: u32) -> Result<Vec<Subscription>, ApiError> {
        let request = self
            .client
            .get(self.url("/subscriptions/upcoming"))
            .query(&[("days", days.to_string())]);
        let body: Value = self.send_json(request).await?;
        Ok(normalize_collection(body))
    }

    async fn scan(&self) -> Result<Vec<Subscription>, ApiError> {
        let body: Value = self
            .post_json::<(), _>("/subscriptions/scan_real", None)
            .await?;
        Ok(normalize_collection(body))
    }

    async fn decide(
        &self,
        id: SubscriptionId,
        decision: Decision,
    ) -> Result<ApprovalOutcome, ApiError> {
        let body = ApprovalRequest {
            subscription_id: id,
            decision,
        };
        self.post_json("/approvals", Some(&body)).await
    }

    async fn start_cancellation(
        &self,
        id: SubscriptionId,
    ) -> Result<CancellationStarted, ApiError> {
        let body = CancellationRequest {
            subscription_id: id,
        };
        self.post_json("/cancellations/start", Some(&body)).await
    }

    async fn cancellation_status(
        &self,
        id: SubscriptionId,
    ) -> Result<CancellationStatus, ApiError> {
        self.get_json(&format!("/cancellations/status/{id}")).await
    }

    async fn create_link_token(&self) -> Result<LinkToken, ApiError> {
        self.post_json::<(), _>("/plaid/link_token", None).await
    }

    async fn exchange_public_token(&self, public_token: &str) -> Result<ExchangeResult, ApiError> {
        let body = PublicTokenExchange {
            public_token: public_token.to_string(),
        };
        self.post_json("/plaid/exchange", Some(&body)).await
    }

    async fn events(&self) -> Result<Vec<ActivityEvent>, ApiError> {
        self.get_json("/events/").await
    }
}
