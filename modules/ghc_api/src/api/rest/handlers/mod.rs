//! Axum handlers. Each one runs inside `AppContext::auditable` and follows the
//! same order: guard, identifiers, `If-Match`, body, service call, side
//! effects, payload.

pub mod customers;
pub mod evaluation_reports;
pub mod moves;
pub mod orders;
pub mod payment_service_items;
pub mod shipments;
pub mod uploads;
