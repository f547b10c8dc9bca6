//! Notification dispatcher - turns a directive and its resolved recipients
//! into delivery actions, one delivery record per recipient.
//!
//! Interactive roles get an idempotent in-app alert (insert-if-absent on
//! the dedup key); the customer role gets an email request enqueued with
//! at-least-once semantics. Channel failures become failed records, never
//! errors: the caller always gets exactly one record per recipient.

use chrono::Utc;
use tracing::{debug, error, instrument};

use crate::common::{AlertId, Channel};
use crate::domains::assets::StatusChangeEvent;
use crate::domains::notifications::models::{
    dedup_key, Alert, DeliveryOutcome, DeliveryRecord, NotificationDirective,
};
use crate::kernel::deps::ServerDeps;
use crate::kernel::traits::{DirectoryUser, EmailRequest};

/// Dispatch one directive to its resolved recipients.
///
/// Every recipient yields exactly one `DeliveryRecord`, whatever the
/// outcome (delivered / failed / suppressed duplicate).
pub async fn dispatch(
    deps: &ServerDeps,
    event: &StatusChangeEvent,
    directive: &NotificationDirective,
    recipients: &[DirectoryUser],
) -> Vec<DeliveryRecord> {
    // Deliveries are independent; run them concurrently. join_all keeps
    // the records in recipient order.
    let deliveries = recipients
        .iter()
        .map(|recipient| deliver_one(deps, event, directive, recipient));
    futures::future::join_all(deliveries).await
}

#[instrument(
    skip(deps, event, directive, recipient),
    fields(event_id = %event.event_id, rule = directive.rule.key(), user_id = %recipient.id)
)]
async fn deliver_one(
    deps: &ServerDeps,
    event: &StatusChangeEvent,
    directive: &NotificationDirective,
    recipient: &DirectoryUser,
) -> DeliveryRecord {
    let key = dedup_key(event, directive.rule, recipient.id);
    let channel = recipient.role.channel();

    let outcome = match channel {
        Channel::InApp => deliver_alert(deps, event, directive, recipient, &key).await,
        Channel::Email => deliver_email(deps, directive, recipient, &key).await,
    };

    DeliveryRecord {
        event_id: event.event_id,
        rule: directive.rule,
        user_id: recipient.id,
        role: recipient.role,
        channel,
        outcome,
        recorded_at: Utc::now(),
    }
}

/// Persist an in-app alert, idempotent on the dedup key.
async fn deliver_alert(
    deps: &ServerDeps,
    event: &StatusChangeEvent,
    directive: &NotificationDirective,
    recipient: &DirectoryUser,
    key: &str,
) -> DeliveryOutcome {
    let alert = Alert {
        id: AlertId::new(),
        user_id: recipient.id,
        event_id: event.event_id,
        dedup_key: key.to_string(),
        title: directive.title.clone(),
        body: directive.body.clone(),
        severity: directive.severity.as_str().to_string(),
        action_url: format!("{}{}", deps.asset_view_base_url, directive.action_path),
        created_at: Utc::now(),
    };

    match deps.alert_store.insert_if_absent(&alert).await {
        Ok(true) => {
            debug!("alert delivered");
            deps.alert_feed.publish(recipient.id, &alert).await;
            DeliveryOutcome::Delivered
        }
        Ok(false) => {
            debug!(dedup_key = %key, "duplicate alert suppressed");
            DeliveryOutcome::SuppressedDuplicate
        }
        Err(e) => {
            error!(error = %e, "alert store write failed");
            DeliveryOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

/// Enqueue an out-of-band email request (at-least-once downstream).
async fn deliver_email(
    deps: &ServerDeps,
    directive: &NotificationDirective,
    recipient: &DirectoryUser,
    key: &str,
) -> DeliveryOutcome {
    let request = EmailRequest {
        to: recipient.email.clone(),
        subject: directive.title.clone(),
        body: directive.body.clone(),
        correlation_id: key.to_string(),
    };

    match deps.email_queue.enqueue(request).await {
        Ok(()) => {
            debug!("email request enqueued");
            DeliveryOutcome::Delivered
        }
        Err(e) => {
            error!(error = %e, "email enqueue failed");
            DeliveryOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}
