use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::api::rest::context::AppContext;
use crate::domain::events::{AuditRecord, EndpointKey, Event, EventKey};
use crate::domain::ports::{AuditCapture, EventTrigger};

/// Post-commit side effects. Failures are logged and never change the
/// response of the request that caused them.
#[derive(Clone)]
pub struct Emitter {
    audit: Arc<dyn AuditCapture>,
    events: Arc<dyn EventTrigger>,
}

impl Emitter {
    pub fn new(audit: Arc<dyn AuditCapture>, events: Arc<dyn EventTrigger>) -> Self {
        Self { audit, events }
    }

    #[instrument(name = "ghc_api.emitter.capture", skip(self, ctx), fields(path = %ctx.path))]
    pub async fn capture(
        &self,
        ctx: &AppContext,
        operation: &'static str,
        object_type: &'static str,
        object_id: Uuid,
    ) {
        let record = AuditRecord {
            operation,
            object_type,
            object_id,
            actor_user_id: ctx.session.user_id,
            office_user_id: ctx.session.office_user_id,
            method: ctx.method.to_string(),
            path: ctx.path.clone(),
            trace_id: ctx.trace_id.clone(),
            at: Utc::now(),
        };
        match self.audit.capture(&record).await {
            Ok(()) => debug!("audit record captured"),
            Err(e) => warn!(error = %e, "audit capture failed"),
        }
    }

    #[instrument(
        name = "ghc_api.emitter.trigger",
        skip_all,
        fields(event_key = %event_key, endpoint_key = %endpoint_key, object_id = %object_id)
    )]
    pub async fn trigger(
        &self,
        ctx: &AppContext,
        event_key: EventKey,
        endpoint_key: EndpointKey,
        object_id: Uuid,
        move_id: Uuid,
    ) {
        let event = Event {
            event_key,
            endpoint_key,
            object_id,
            move_id,
            trace_id: ctx.trace_id.clone(),
        };
        match self.events.trigger(&event).await {
            Ok(()) => debug!("event triggered"),
            Err(e) => warn!(error = %e, "event trigger failed"),
        }
    }
}
