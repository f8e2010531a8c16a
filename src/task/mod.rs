pub mod busy;
pub mod cancellation_poller;
