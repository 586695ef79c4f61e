//! Notification dispatcher: persists and pushes the notices a domain event
//! produces.

use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use orderpulse_core::events::DomainEvent;
use orderpulse_core::types::{EventId, UserId};
use orderpulse_database::UserDirectory;
use orderpulse_service::NotificationStore;

use crate::channel::Topic;
use crate::connection::PublishOutcome;
use crate::message::{EVENT_NOTIFICATION, NotificationPush};
use crate::server::RealtimeEngine;

use super::formatter::{Audience, NoticeDraft, NotificationFormatter};

/// What a single dispatch achieved. Failures are counted, never raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Records written.
    pub persisted: usize,
    /// Records that failed to write.
    pub persistence_failures: usize,
    /// Sessions that queued a push.
    pub delivered: usize,
    /// Publishes that found no live member.
    pub skipped: usize,
    /// Publishes that failed outright.
    pub publish_failures: usize,
}

/// Routes domain events to the notification store and the realtime engine.
pub struct NotificationDispatcher {
    store: Arc<NotificationStore>,
    users: Arc<dyn UserDirectory>,
    engine: Arc<RealtimeEngine>,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher").finish()
    }
}

impl NotificationDispatcher {
    /// Create a new dispatcher.
    pub fn new(
        store: Arc<NotificationStore>,
        users: Arc<dyn UserDirectory>,
        engine: Arc<RealtimeEngine>,
    ) -> Self {
        Self {
            store,
            users,
            engine,
        }
    }

    /// Dispatches an event and waits for persistence and publish to finish.
    ///
    /// Storage and publish failures are independent: a notice that could not
    /// be saved is still pushed, without an id.
    pub async fn dispatch(&self, event: &DomainEvent) -> DispatchReport {
        self.engine.metrics().event_dispatched();
        let mut report = DispatchReport::default();

        for draft in NotificationFormatter::plan(event) {
            match draft.audience {
                Audience::Customer(recipient) => {
                    self.deliver_to_customer(event.id, recipient, draft, &mut report)
                        .await;
                }
                Audience::Staff => self.deliver_to_staff(event.id, draft, &mut report).await,
            }
        }

        debug!(
            event_id = %event.id,
            event = event.name(),
            persisted = report.persisted,
            delivered = report.delivered,
            "Domain event dispatched"
        );
        report
    }

    /// Dispatches on the runtime without making the caller wait.
    pub fn spawn_dispatch(self: &Arc<Self>, event: DomainEvent) -> JoinHandle<DispatchReport> {
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move { dispatcher.dispatch(&event).await })
    }

    async fn deliver_to_customer(
        &self,
        event_id: EventId,
        recipient: UserId,
        draft: NoticeDraft,
        report: &mut DispatchReport,
    ) {
        let category = draft.context.category();
        let push = match self
            .store
            .create(recipient, draft.title.clone(), draft.body.clone(), draft.context.clone())
            .await
        {
            Ok(notification) => {
                report.persisted += 1;
                self.engine.metrics().notification_persisted();
                NotificationPush::from(&notification)
            }
            Err(e) => {
                report.persistence_failures += 1;
                self.engine.metrics().persistence_failed();
                error!(
                    recipient_id = %recipient,
                    category = %category,
                    event_id = %event_id,
                    error = %e,
                    "Failed to persist notification"
                );
                NotificationPush::unsaved(draft.title, draft.body, draft.context)
            }
        };

        self.publish(Topic::User(recipient), &push, event_id, report);
    }

    async fn deliver_to_staff(
        &self,
        event_id: EventId,
        draft: NoticeDraft,
        report: &mut DispatchReport,
    ) {
        let category = draft.context.category();
        let staff = match self.users.find_staff().await {
            Ok(staff) => staff,
            Err(e) => {
                error!(
                    category = %category,
                    event_id = %event_id,
                    error = %e,
                    "Failed to load staff recipients"
                );
                Vec::new()
            }
        };

        let writes = staff.iter().map(|user| {
            self.store.create(
                user.id,
                draft.title.clone(),
                draft.body.clone(),
                draft.context.clone(),
            )
        });
        for (user, result) in staff.iter().zip(join_all(writes).await) {
            match result {
                Ok(_) => {
                    report.persisted += 1;
                    self.engine.metrics().notification_persisted();
                }
                Err(e) => {
                    report.persistence_failures += 1;
                    self.engine.metrics().persistence_failed();
                    error!(
                        recipient_id = %user.id,
                        category = %category,
                        event_id = %event_id,
                        error = %e,
                        "Failed to persist staff notification"
                    );
                }
            }
        }

        // One frame for the whole staff group; each record has its own id.
        let push = NotificationPush::unsaved(draft.title, draft.body, draft.context);
        self.publish(Topic::Admin, &push, event_id, report);
    }

    fn publish(
        &self,
        topic: Topic,
        push: &NotificationPush,
        event_id: EventId,
        report: &mut DispatchReport,
    ) {
        match self.engine.publish(&topic, EVENT_NOTIFICATION, push) {
            Ok(PublishOutcome::Delivered { delivered, .. }) => report.delivered += delivered,
            Ok(PublishOutcome::Skipped) => report.skipped += 1,
            Err(e) => {
                report.publish_failures += 1;
                warn!(
                    topic = %topic,
                    category = %push.context.category(),
                    event_id = %event_id,
                    error = %e,
                    "Failed to publish notification"
                );
            }
        }
    }
}
