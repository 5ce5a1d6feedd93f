//! Create/update request bodies.

use std::collections::HashSet;

use crate::models::{
    ContentItem, EntityId, LeadUnitForm, LeadUnitPayload, Organization, OrganizationAssociation,
    SaveMode,
};
use crate::services::dates::parse_flexible_date;

/// Keys the payload sets itself; form copies of them are dropped.
const RESERVED_KEYS: &[&str] = &["startDate", "endDate", "organizationDetails"];

/// Diff persisted links (`before`) against the current selection (`after`).
///
/// Output order: links for newly selected organizations in `after` order,
/// then every `before` link in its original order, marked deleted when its
/// organization is no longer selected and otherwise left as it was.
pub fn build_payload_to_send(
    before: &[OrganizationAssociation],
    after: &[Organization],
) -> Vec<OrganizationAssociation> {
    let before_ids: HashSet<&EntityId> = before.iter().map(|l| &l.organization_id).collect();
    let after_ids: HashSet<&EntityId> = after.iter().map(|o| &o.organization_id).collect();

    let mut result = Vec::with_capacity(before.len() + after.len());

    for org in after {
        if !before_ids.contains(&org.organization_id) {
            result.push(OrganizationAssociation::new_link(org.organization_id.clone()));
        }
    }

    for link in before {
        let deleted = if after_ids.contains(&link.organization_id) {
            link.deleted
        } else {
            true
        };
        result.push(OrganizationAssociation {
            id: link.id.clone(),
            organization_id: link.organization_id.clone(),
            deleted,
        });
    }

    result
}

/// Build the request body for saving a lead unit.
///
/// `startDate` is always normalized; a missing `endDate` becomes an empty
/// string. The form's own `id` is kept. In edit mode the links are
/// reconciled against `existing`, whose id replaces the form's; without an
/// existing record no links are sent.
pub fn build_lead_unit_payload(
    form: &LeadUnitForm,
    selected: &[Organization],
    mode: SaveMode,
    existing: Option<&ContentItem>,
) -> LeadUnitPayload {
    let mut fields = form.fields.clone();
    for key in RESERVED_KEYS {
        fields.remove(*key);
    }
    let id = fields
        .remove("id")
        .and_then(|v| serde_json::from_value::<EntityId>(v).ok());

    let mut payload = LeadUnitPayload {
        id,
        start_date: parse_flexible_date(&form.start_date),
        end_date: form
            .end_date
            .as_ref()
            .map(parse_flexible_date)
            .unwrap_or_default(),
        organization_details: None,
        fields,
    };

    match (mode, existing) {
        (SaveMode::Add, _) => {
            payload.organization_details = Some(
                selected
                    .iter()
                    .map(|org| OrganizationAssociation::new_link(org.organization_id.clone()))
                    .collect(),
            );
        }
        (SaveMode::Edit, Some(detail)) => {
            payload.organization_details =
                Some(build_payload_to_send(&detail.organization_details, selected));
            if let Some(id) = &detail.id {
                payload.id = Some(id.clone());
            }
        }
        (SaveMode::Edit, None) => {}
    }

    payload
}
