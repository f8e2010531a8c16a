//! Records exchanged with the Approval API.
//!
//! Raw server shapes are deserialized into `Raw*` structs and normalized into
//! the canonical records the rest of the crate works with.

pub mod action;
pub mod activity;
pub mod auth;
pub mod normalize;
pub mod subscription;
pub mod time;

pub use action::ApprovalOutcome;
pub use action::CancellationStarted;
pub use action::CancellationStatus;
pub use action::Decision;
pub use action::ExchangeResult;
pub use action::LinkToken;
pub use activity::ActivityEvent;
pub use auth::AccessToken;
pub use auth::Credentials;
pub use subscription::Interval;
pub use subscription::Money;
pub use subscription::RawSubscription;
pub use subscription::Subscription;
pub use subscription::SubscriptionId;
pub use subscription::SubscriptionStatus;
