//! Plain-text rendering of command results.

use chrono::DateTime;
use chrono::Utc;

use crate::entity::ActivityEvent;
use crate::entity::ApprovalOutcome;
use crate::entity::CancellationStatus;
use crate::entity::Decision;
use crate::entity::Subscription;
use crate::entity::SubscriptionId;
use crate::task::cancellation_poller::PollOutcome;

const UPCOMING_SHOWN: usize = 5;

pub fn subscription_line(sub: &Subscription) -> String {
    let mut line = format!("#{} {}  [{}]", sub.id, sub.headline(), sub.status);
    if let Some(next) = sub.next_renewal_at {
        line.push_str(&format!(" next {}", next.format("%Y-%m-%d")));
    }
    line
}

pub fn subscription_list(subs: &[Subscription]) -> String {
    if subs.is_empty() {
        return "No subscriptions found yet. Connect a bank with `approval link-token` to get started."
            .to_string();
    }
    let mut out = subs
        .iter()
        .map(subscription_line)
        .collect::<Vec<_>>()
        .join("\n");

    // Cancellations already underway or finished are not offered again.
    let cancellable: Vec<_> = subs
        .iter()
        .filter(|s| s.can_start_cancellation())
        .map(|s| format!("#{}", s.id))
        .collect();
    if !cancellable.is_empty() {
        out.push_str(&format!(
            "\nStart a cancellation with `approval cancel <id>`: {}",
            cancellable.join(", ")
        ));
    }
    out
}

/// `today`, `in 1 day`, `in N days`, or `soon` when the date is unknown.
pub fn due_label(next_renewal_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(due) = next_renewal_at else {
        return "soon".to_string();
    };
    let millis = (due - now).num_milliseconds();
    let days = millis.div_euclid(86_400_000) + i64::from(millis.rem_euclid(86_400_000) != 0);
    match days {
        d if d <= 0 => "today".to_string(),
        1 => "in 1 day".to_string(),
        d => format!("in {d} days"),
    }
}

/// Summary of renewals due within `days`, listing the first few.
pub fn upcoming_banner(subs: &[Subscription], days: u32, now: DateTime<Utc>) -> String {
    if subs.is_empty() {
        return format!("No renewals due in the next {days} days.");
    }
    let plural = if subs.len() > 1 { "s" } else { "" };
    let mut out = format!(
        "{} upcoming renewal{plural} in the next {days} days",
        subs.len()
    );
    for sub in subs.iter().take(UPCOMING_SHOWN) {
        out.push_str(&format!(
            "\n  #{} {} • due {}",
            sub.id,
            sub.headline(),
            due_label(sub.next_renewal_at, now)
        ));
    }
    if subs.len() > UPCOMING_SHOWN {
        out.push_str(&format!("\n  … and {} more", subs.len() - UPCOMING_SHOWN));
    }
    out
}

pub fn approval_outcome(outcome: &ApprovalOutcome) -> String {
    let verb = match outcome.decision {
        Decision::Approve => "Approved",
        Decision::Deny => "Denied",
    };
    let mut out = format!("{verb} renewal of subscription {}.", outcome.subscription_id);
    if outcome.cancel_started {
        out.push_str(" Cancellation started.");
    }
    if let Some(error) = &outcome.error {
        out.push_str(&format!(" Cancellation could not start: {error}"));
    }
    out
}

pub fn poll_outcome(id: SubscriptionId, outcome: &PollOutcome) -> String {
    match outcome {
        PollOutcome::Terminal { subscription, .. } => {
            format!("Subscription {id} is now {}.", subscription.settled_status())
        }
        PollOutcome::Exhausted { last_seen, .. } => {
            let status = last_seen
                .as_ref()
                .map_or("unknown".to_string(), |s| s.status.to_string());
            format!(
                "Cancellation of subscription {id} requested; status is still {status}. Check again later with `approval status {id}`."
            )
        }
    }
}

pub fn cancellation_status(status: &CancellationStatus) -> String {
    let mut out = format!(
        "Subscription {}: {}",
        status.subscription_id,
        status.cancel_status.as_deref().unwrap_or("active")
    );
    if let Some(at) = status.canceled_at {
        out.push_str(&format!(" (canceled {})", at.format("%Y-%m-%d %H:%M")));
    }
    out
}

pub fn activity_list(events: &[ActivityEvent]) -> String {
    if events.is_empty() {
        return "No activity yet.".to_string();
    }
    events
        .iter()
        .map(|e| {
            let when = e
                .created_at
                .map_or(String::new(), |t| t.format("%Y-%m-%d %H:%M").to_string());
            format!("{when} {} • {}", e.message, e.kind).trim_start().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
