use crate::api::error::ApiError;
use crate::entity::SubscriptionId;
use crate::session::error::SessionError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("Not signed in. Run `approval login` first.")]
    NotSignedIn,

    #[error("Subscription {id} is busy with another action.")]
    Busy { id: SubscriptionId },

    #[error("Unexpected result: {message}")]
    UnexpectedResult { message: String },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}
