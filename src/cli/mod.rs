//! Command-line front-end.

use chrono::Utc;
use clap::Parser;
use clap::Subcommand;

use crate::entity::Credentials;
use crate::entity::Decision;
use crate::entity::SubscriptionId;
use crate::service::Services;
use crate::service::error::ServiceError;

pub mod views;

#[derive(Debug, Parser)]
#[command(name = "approval", version, about = "Manage recurring subscriptions found in your bank account")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account and sign in
    Signup {
        #[arg(long, env = "APPROVAL_EMAIL")]
        email: String,
        #[arg(long, env = "APPROVAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in to an existing account
    Login {
        #[arg(long, env = "APPROVAL_EMAIL")]
        email: String,
        #[arg(long, env = "APPROVAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// List discovered subscriptions
    List,
    /// Show renewals due soon
    Upcoming {
        /// Window in days (defaults to UPCOMING_DAYS)
        #[arg(long)]
        days: Option<u32>,
    },
    /// Rescan bank transactions for subscriptions
    Scan,
    /// Approve the pending renewal of a subscription
    Approve { id: SubscriptionId },
    /// Deny the pending renewal of a subscription
    Deny { id: SubscriptionId },
    /// Cancel a subscription and wait for the cancellation to finish
    Cancel { id: SubscriptionId },
    /// Show the cancellation status of a subscription
    Status { id: SubscriptionId },
    /// Create a session token for the bank-link widget
    LinkToken,
    /// Exchange the public token returned by the bank-link widget
    Exchange { public_token: String },
    /// Show the account's activity log
    Activity,
}

/// Runs one command and returns what should be printed.
pub async fn run(command: Command, services: &Services) -> Result<String, ServiceError> {
    match command {
        Command::Signup { email, password } => {
            services
                .auth
                .signup(&Credentials::new(email.clone(), password))
                .await?;
            Ok(format!("Signed up as {email}."))
        }
        Command::Login { email, password } => {
            services
                .auth
                .login(&Credentials::new(email.clone(), password))
                .await?;
            Ok(format!("Logged in as {email}."))
        }
        Command::Logout => {
            services.auth.logout()?;
            Ok("Logged out.".to_string())
        }
        Command::List => {
            let subscriptions = services.subscriptions.list().await?;
            Ok(views::subscription_list(&subscriptions))
        }
        Command::Upcoming { days } => {
            let window = days.unwrap_or(services.subscriptions.default_upcoming_days());
            let subscriptions = services.subscriptions.upcoming(Some(window)).await?;
            Ok(views::upcoming_banner(&subscriptions, window, Utc::now()))
        }
        Command::Scan => {
            let subscriptions = services.subscriptions.rescan().await?;
            Ok(views::subscription_list(&subscriptions))
        }
        Command::Approve { id } => decide(services, id, Decision::Approve).await,
        Command::Deny { id } => decide(services, id, Decision::Deny).await,
        Command::Cancel { id } => {
            let outcome = services.subscriptions.cancel(id).await?;
            Ok(views::poll_outcome(id, &outcome))
        }
        Command::Status { id } => {
            let status = services.subscriptions.cancellation_status(id).await?;
            Ok(views::cancellation_status(&status))
        }
        Command::LinkToken => {
            let token = services.bank_link.link_token().await?;
            Ok(token.link_token)
        }
        Command::Exchange { public_token } => {
            let subscriptions = services.bank_link.exchange(&public_token).await?;
            Ok(format!(
                "Bank connected.\n{}",
                views::subscription_list(&subscriptions)
            ))
        }
        Command::Activity => {
            let events = services.activity.events().await?;
            Ok(views::activity_list(&events))
        }
    }
}

async fn decide(
    services: &Services,
    id: SubscriptionId,
    decision: Decision,
) -> Result<String, ServiceError> {
    let result = services.subscriptions.decide(id, decision).await?;
    Ok(format!(
        "{}\n{}",
        views::approval_outcome(&result.outcome),
        views::subscription_list(&result.subscriptions)
    ))
}
