//! approval - client for the Approval subscription-management API.
//!
//! This crate provides:
//! - An HTTP client for the Approval API with bearer-token sessions
//! - Normalization of the server's subscription shapes into one record
//! - A poller that follows a cancellation until it completes
//! - A command-line front-end over the same services

pub mod api;
pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod logging;
pub mod service;
pub mod session;
pub mod task;
