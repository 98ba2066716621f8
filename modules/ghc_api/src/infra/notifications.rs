use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::events::Event;
use crate::domain::ports::EventTrigger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
}

/// A webhook notification waiting to be delivered to the prime contractor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub event_key: &'static str,
    pub endpoint_key: &'static str,
    pub move_task_order_id: Uuid,
    pub object_id: Uuid,
    pub payload: serde_json::Value,
    pub status: NotificationStatus,
    pub trace_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Event trigger that queues notifications in memory. Delivery is out of
/// process; callers drain `pending()`.
#[derive(Debug, Default)]
pub struct InMemoryNotificationQueue {
    queue: Mutex<Vec<Notification>>,
}

impl InMemoryNotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Vec<Notification> {
        self.queue
            .lock()
            .iter()
            .filter(|n| n.status == NotificationStatus::Pending)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Record the delivery outcome of a queued notification.
    pub fn mark(&self, id: Uuid, status: NotificationStatus) -> bool {
        match self.queue.lock().iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.status = status;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl EventTrigger for InMemoryNotificationQueue {
    #[instrument(name = "ghc_api.notifications.trigger", skip_all, fields(event = %event.event_key))]
    async fn trigger(&self, event: &Event) -> Result<(), DomainError> {
        let notification = Notification {
            id: Uuid::new_v4(),
            event_key: event.event_key.as_str(),
            endpoint_key: event.endpoint_key.as_str(),
            move_task_order_id: event.move_id,
            object_id: event.object_id,
            payload: json!({
                "eventKey": event.event_key.as_str(),
                "objectId": event.object_id,
                "moveTaskOrderId": event.move_id,
            }),
            status: NotificationStatus::Pending,
            trace_id: event.trace_id.clone(),
            created_at: Utc::now(),
        };
        debug!(id = %notification.id, "notification queued");
        self.queue.lock().push(notification);
        Ok(())
    }
}
