//! JSON payloads. Field names are camelCase, absent values serialize as
//! `null`, and collections keep the order the service returned.

mod common;
mod customers;
mod documents;
mod evaluation_reports;
mod moves;
mod orders;
mod payments;
mod shipments;

pub use common::{AddressDto, PageQuery};
pub use customers::*;
pub use documents::*;
pub use evaluation_reports::*;
pub use moves::*;
pub use orders::*;
pub use payments::*;
pub use shipments::*;
