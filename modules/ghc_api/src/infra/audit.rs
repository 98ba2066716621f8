use async_trait::async_trait;
use tracing::info;

use crate::domain::error::DomainError;
use crate::domain::events::AuditRecord;
use crate::domain::ports::AuditCapture;

/// Writes audit records to the `ghc_api::audit` tracing target, which the logging
/// config can route to its own file.
#[derive(Debug, Default, Clone)]
pub struct TracingAuditCapture;

#[async_trait]
impl AuditCapture for TracingAuditCapture {
    async fn capture(&self, record: &AuditRecord) -> Result<(), DomainError> {
        let json = serde_json::to_string(record)
            .map_err(|e| DomainError::unexpected_from("serialize audit record", e))?;
        info!(
            target: "ghc_api::audit",
            operation = record.operation,
            object_type = record.object_type,
            object_id = %record.object_id,
            actor = %record.actor_user_id,
            record = %json,
            "audit"
        );
        Ok(())
    }
}
