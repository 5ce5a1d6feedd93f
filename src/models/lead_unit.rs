//! Lead unit (risk focal unit) records and their organization links.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::{deleted_flag, EntityId};

/// Filter and pagination criteria for listing records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPayload {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: Option<i32>,
    pub size: u32,
    pub page: u32,
}

impl Default for SearchPayload {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: None,
            size: 10,
            page: 0,
        }
    }
}

impl SearchPayload {
    /// Query pairs in the order the backend documents them.
    /// A missing status is left out entirely.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("search".to_string(), self.search.clone())];
        if let Some(status) = self.status {
            pairs.push(("status".to_string(), status.to_string()));
        }
        pairs.push(("size".to_string(), self.size.to_string()));
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs
    }
}

/// Link between a lead unit and an organization.
///
/// `id` is absent for links that have not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationAssociation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub organization_id: EntityId,
    #[serde(default, with = "deleted_flag")]
    pub deleted: bool,
}

impl OrganizationAssociation {
    /// A link the server has not seen yet.
    pub fn new_link(organization_id: EntityId) -> Self {
        Self {
            id: None,
            organization_id,
            deleted: false,
        }
    }
}

/// A lead unit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub organization_details: Vec<OrganizationAssociation>,
    /// Fields this client does not interpret, kept for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An organization that can be linked to a lead unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub organization_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Organization {
    pub fn new(organization_id: impl Into<EntityId>) -> Self {
        Self {
            organization_id: organization_id.into(),
            code: None,
            name: None,
            extra: Map::new(),
        }
    }

    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.code.as_deref())
            .unwrap_or_default()
    }
}

impl From<&OrganizationAssociation> for Organization {
    fn from(link: &OrganizationAssociation) -> Self {
        Organization::new(link.organization_id.clone())
    }
}

/// Budget category entry used as a reference value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestor_code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Whether a save creates a new record or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    #[default]
    Add,
    Edit,
}

impl SaveMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveMode::Add => "add",
            SaveMode::Edit => "edit",
        }
    }
}

/// Form input for creating or editing a lead unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadUnitForm {
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Request body for the create and update endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadUnitPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_details: Option<Vec<OrganizationAssociation>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_omits_missing_status() {
        let payload = SearchPayload {
            search: "test".to_string(),
            status: None,
            size: 10,
            page: 0,
        };
        let keys: Vec<String> = payload.to_query().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["search", "size", "page"]);
    }

    #[test]
    fn test_association_deleted_flag_wire_format() {
        let link: OrganizationAssociation =
            serde_json::from_str(r#"{"id": 1, "organizationId": "A", "deleted": 1}"#).unwrap();
        assert!(link.deleted);

        let json = serde_json::to_value(OrganizationAssociation::new_link("B".into())).unwrap();
        assert_eq!(json, serde_json::json!({"organizationId": "B", "deleted": 0}));
    }

    #[test]
    fn test_content_item_keeps_unknown_fields() {
        let item: ContentItem = serde_json::from_value(serde_json::json!({
            "id": 9,
            "name": "Unit",
            "startDate": "14/05/2025",
            "endDate": null,
            "organizationDetails": [{"id": 3, "organizationId": 100, "deleted": 0}],
            "createdBy": "admin"
        }))
        .unwrap();

        assert_eq!(item.id, Some(EntityId::Number(9)));
        assert_eq!(item.organization_details.len(), 1);
        assert_eq!(item.extra.get("createdBy"), Some(&Value::from("admin")));
    }

    #[test]
    fn test_form_fields_flatten_into_payload() {
        let form: LeadUnitForm = serde_json::from_value(serde_json::json!({
            "name": "Risk desk",
            "startDate": "2025-05-14",
            "endDate": null
        }))
        .unwrap();
        assert_eq!(form.start_date, "2025-05-14");
        assert_eq!(form.end_date, None);
        assert_eq!(form.fields.get("name"), Some(&Value::from("Risk desk")));
    }
}
