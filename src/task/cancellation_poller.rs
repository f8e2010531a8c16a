//! Follows a cancellation until the server reports a terminal status.
//!
//! The server gives no completion signal, so after starting a cancellation the
//! poller re-fetches the subscription list a bounded number of times with a
//! fixed delay in between.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use log::error;
use log::info;
use tokio::time::sleep;

use crate::api::SubscriptionApi;
use crate::config::Config;
use crate::config::DEFAULT_POLL_ATTEMPTS;
use crate::config::DEFAULT_POLL_DELAY_MS;
use crate::entity::Subscription;
use crate::entity::SubscriptionId;
use crate::entity::SubscriptionStatus;
use crate::service::error::ServiceError;
use crate::task::busy::BusyMarker;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    /// Refresh budget after the start request.
    pub max_attempts: u32,
    /// Wait before each refresh.
    pub delay: Duration,
}

impl PollPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.poll_attempts, config.poll_delay)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_POLL_ATTEMPTS,
            Duration::from_millis(DEFAULT_POLL_DELAY_MS),
        )
    }
}

/// Where a cancellation is in its lifecycle, from the client's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollState {
    Idle,
    /// Start request in flight.
    Requesting,
    /// Waiting for, or performing, refresh number `attempt` (1-based).
    Polling { attempt: u32 },
    /// The subscription was seen with a terminal status.
    Terminal,
    /// The refresh budget ran out without seeing a terminal status.
    Exhausted,
    /// A request failed.
    Aborted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollEvent {
    Begin,
    Started,
    /// A refresh came back; carries the target's status if it was listed.
    Refreshed(Option<SubscriptionStatus>),
    Failed,
}

impl PollState {
    /// Pure transition function. Events that make no sense in the current
    /// state leave it unchanged.
    pub fn next(self, event: &PollEvent, max_attempts: u32) -> PollState {
        match (self, event) {
            (PollState::Idle, PollEvent::Begin) => PollState::Requesting,
            (PollState::Requesting, PollEvent::Started) => {
                if max_attempts == 0 {
                    PollState::Exhausted
                } else {
                    PollState::Polling { attempt: 1 }
                }
            }
            (PollState::Requesting | PollState::Polling { .. }, PollEvent::Failed) => {
                PollState::Aborted
            }
            (PollState::Polling { .. }, PollEvent::Refreshed(Some(status)))
                if status.is_terminal() =>
            {
                PollState::Terminal
            }
            (PollState::Polling { attempt }, PollEvent::Refreshed(_)) => {
                if attempt >= max_attempts {
                    PollState::Exhausted
                } else {
                    PollState::Polling {
                        attempt: attempt + 1,
                    }
                }
            }
            (state, _) => state,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            PollState::Terminal | PollState::Exhausted | PollState::Aborted
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PollOutcome {
    /// Stopped early: the subscription reached a terminal status.
    Terminal {
        refreshes: u32,
        subscription: Subscription,
    },
    /// Every refresh was spent. The status may still change server-side.
    Exhausted {
        refreshes: u32,
        last_seen: Option<Subscription>,
    },
}

impl PollOutcome {
    pub fn refreshes(&self) -> u32 {
        match self {
            PollOutcome::Terminal { refreshes, .. } | PollOutcome::Exhausted { refreshes, .. } => {
                *refreshes
            }
        }
    }
}

pub struct CancellationPoller {
    api: Arc<dyn SubscriptionApi>,
    busy: BusyMarker,
    policy: PollPolicy,
}

impl CancellationPoller {
    pub fn new(api: Arc<dyn SubscriptionApi>, busy: BusyMarker, policy: PollPolicy) -> Self {
        Self { api, busy, policy }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    pub fn busy(&self) -> &BusyMarker {
        &self.busy
    }

    /// Starts cancelling `id` and polls until it is terminal or the budget is
    /// spent.
    ///
    /// The busy marker is held for the whole run and released on every exit
    /// path. A failed request aborts the run without retrying.
    pub async fn cancel(&self, id: SubscriptionId) -> Result<PollOutcome, ServiceError> {
        let Some(_guard) = self.busy.acquire(id) else {
            return Err(ServiceError::Busy { id });
        };
        let max = self.policy.max_attempts;

        let mut state = PollState::Idle.next(&PollEvent::Begin, max);
        info!("Starting cancellation for subscription {id}.");
        match self.api.start_cancellation(id).await {
            Ok(started) => {
                debug!(
                    "Cancellation for subscription {id} accepted with status `{}`",
                    started.status
                );
                state = state.next(&PollEvent::Started, max);
            }
            Err(e) => {
                state = state.next(&PollEvent::Failed, max);
                error!("Failed to start cancellation for subscription {id} ({state:?}): {e}");
                return Err(e.into());
            }
        }

        let mut refreshes = 0;
        let mut last_seen: Option<Subscription> = None;
        while let PollState::Polling { attempt } = state {
            sleep(self.policy.delay).await;

            let subscriptions = match self.api.list_subscriptions().await {
                Ok(subscriptions) => subscriptions,
                Err(e) => {
                    state = state.next(&PollEvent::Failed, max);
                    error!(
                        "Refresh {attempt}/{max} for subscription {id} failed ({state:?}): {e}"
                    );
                    return Err(e.into());
                }
            };
            refreshes = attempt;
            last_seen = subscriptions.into_iter().find(|s| s.id == id);

            let seen = last_seen.as_ref().map(|s| s.settled_status().clone());
            debug!(
                "Refresh {attempt}/{max} for subscription {id}: status {}",
                seen.as_ref()
                    .map_or("<missing>".to_string(), |status| status.to_string())
            );
            state = state.next(&PollEvent::Refreshed(seen), max);
        }

        match (state, last_seen) {
            (PollState::Terminal, Some(subscription)) => {
                info!(
                    "Subscription {id} is {} after {refreshes} refresh(es).",
                    subscription.settled_status()
                );
                Ok(PollOutcome::Terminal {
                    refreshes,
                    subscription,
                })
            }
            (_, last_seen) => {
                info!(
                    "Subscription {id} not terminal after {refreshes} refresh(es); giving up."
                );
                Ok(PollOutcome::Exhausted {
                    refreshes,
                    last_seen,
                })
            }
        }
    }
}
