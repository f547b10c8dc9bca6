//! Event ingress - the pipeline's entry point.
//!
//! `NotificationIngress` decouples notification work from the transaction
//! that committed the status change: `on_status_changed` only enqueues the
//! fact, and a background worker spawns one detached task per event. A slow
//! or failing notification path can therefore never block or fail the
//! status update itself, and events for different assets process fully in
//! parallel.
//!
//! Failure isolation is per directive: if one directive's recipient
//! resolution fails, the other directives still complete and the event is
//! reported as partial success.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domains::assets::StatusChangeEvent;
use crate::domains::notifications::models::{DeliveryRecord, NotificationRule};
use crate::domains::notifications::{audit, dispatcher, resolver, rules};
use crate::kernel::deps::ServerDeps;

/// A directive that failed as a whole (recipient resolution failed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedDirective {
    pub rule: NotificationRule,
    pub error: String,
}

/// Per-event processing summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventReport {
    pub event_id: Uuid,
    /// Number of directives the rule engine produced.
    pub directives_fired: usize,
    /// One record per (directive, resolved recipient) dispatch attempt.
    pub records: Vec<DeliveryRecord>,
    /// Directives that failed before dispatch.
    pub failed_directives: Vec<FailedDirective>,
}

impl EventReport {
    pub fn new(event_id: Uuid, directives_fired: usize) -> Self {
        Self {
            event_id,
            directives_fired,
            records: Vec::new(),
            failed_directives: Vec::new(),
        }
    }

    pub fn delivered(&self) -> usize {
        self.records.iter().filter(|r| r.is_delivered()).count()
    }

    pub fn failed(&self) -> usize {
        self.records.iter().filter(|r| r.is_failed()).count()
    }

    pub fn suppressed(&self) -> usize {
        self.records.iter().filter(|r| r.is_suppressed()).count()
    }

    /// Some directives completed and some failed.
    pub fn is_partial(&self) -> bool {
        !self.failed_directives.is_empty()
            && self.failed_directives.len() < self.directives_fired
    }
}

/// Run the full pipeline for one event: rules, then per directive
/// resolve + dispatch, then the audit trail.
pub async fn process_event(deps: &ServerDeps, event: &StatusChangeEvent) -> EventReport {
    let directives = rules::evaluate(event);
    debug!(
        event_id = %event.event_id,
        asset_id = %event.asset_id,
        previous_status = %event.previous_status,
        new_status = %event.new_status,
        directives = directives.len(),
        "evaluating status change"
    );

    let mut report = EventReport::new(event.event_id, directives.len());

    for directive in &directives {
        match resolver::resolve(
            deps.directory.as_ref(),
            &directive.roles,
            deps.directory_timeout,
        )
        .await
        {
            Ok(recipients) => {
                let records = dispatcher::dispatch(deps, event, directive, &recipients).await;
                report.records.extend(records);
            }
            Err(e) => {
                // Only this directive fails; the rest of the event proceeds.
                warn!(
                    event_id = %event.event_id,
                    rule = directive.rule.key(),
                    error = %e,
                    "directive failed"
                );
                report.failed_directives.push(FailedDirective {
                    rule: directive.rule,
                    error: e.to_string(),
                });
            }
        }
    }

    if !directives.is_empty() {
        audit::record(deps, event, &report).await;
    }

    report
}

/// Handle for the asset domain layer to hand status-change facts to the
/// notification pipeline.
#[derive(Clone)]
pub struct NotificationIngress {
    tx: mpsc::UnboundedSender<StatusChangeEvent>,
}

impl NotificationIngress {
    /// Start the ingress worker.
    ///
    /// Returns the ingress handle and the worker's join handle. The worker
    /// runs until `shutdown` is cancelled or every ingress handle is
    /// dropped; events already spawned finish on their own tasks.
    pub fn start(deps: ServerDeps, shutdown: CancellationToken) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_worker(deps, rx, shutdown));
        (Self { tx }, handle)
    }

    /// Hand a committed status transition to the pipeline.
    ///
    /// Non-blocking; the caller's transaction is already committed and is
    /// never affected by what happens downstream.
    pub fn on_status_changed(&self, event: StatusChangeEvent) {
        if let Err(e) = self.tx.send(event) {
            warn!(event_id = %e.0.event_id, "ingress worker gone; dropping status change");
        }
    }
}

async fn run_worker(
    deps: ServerDeps,
    mut rx: mpsc::UnboundedReceiver<StatusChangeEvent>,
    shutdown: CancellationToken,
) {
    info!("notification ingress starting");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            event = rx.recv() => {
                match event {
                    Some(event) => {
                        // One detached task per event: events for different
                        // assets process fully in parallel, and a panic in
                        // one pipeline run cannot take down the worker.
                        let deps = deps.clone();
                        tokio::spawn(async move {
                            process_event(&deps, &event).await;
                        });
                    }
                    None => break,
                }
            }
        }
    }

    info!("notification ingress stopped");
}
