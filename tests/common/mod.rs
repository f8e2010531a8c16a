//! Common test utilities.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use approval::api::HttpApiClient;
use approval::api::SubscriptionApi;
use approval::service::Services;
use approval::session::MemorySession;
use approval::session::SessionStore;
use approval::task::cancellation_poller::PollPolicy;
use httpmock::MockServer;
use uuid::Uuid;

pub const TOKEN: &str = "test-token";

/// Loads a test response file from the responses directory.
#[allow(dead_code)]
pub fn get_response(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/responses");
    path.push(filename);
    std::fs::read_to_string(path).expect("Failed to read response file")
}

/// A session that is already signed in with [`TOKEN`].
#[allow(dead_code)]
pub fn signed_in() -> Arc<MemorySession> {
    Arc::new(MemorySession::with_token(TOKEN))
}

#[allow(dead_code)]
pub fn client(server: &MockServer, session: Arc<MemorySession>) -> HttpApiClient {
    HttpApiClient::new(&server.base_url(), session).expect("Failed to create client")
}

/// Services against `server` with a fast poll cadence.
#[allow(dead_code)]
pub fn services(server: &MockServer, session: Arc<MemorySession>) -> Services {
    let api: Arc<dyn SubscriptionApi> = Arc::new(client(server, session.clone()));
    let session: Arc<dyn SessionStore> = session;
    Services::with_api(api, session, PollPolicy::new(6, Duration::from_millis(1)), 7)
}

/// A unique path under the system temp directory.
#[allow(dead_code)]
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("approval-test-{}", Uuid::new_v4())).join(name)
}
