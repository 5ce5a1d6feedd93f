//! Data models for lead unit management.

mod id;
mod lead_unit;
mod page;

pub use id::EntityId;
pub use lead_unit::{
    Budget, ContentItem, LeadUnitForm, LeadUnitPayload, Organization, OrganizationAssociation,
    SaveMode, SearchPayload,
};
pub use page::{Envelope, PaginatedResponse};
