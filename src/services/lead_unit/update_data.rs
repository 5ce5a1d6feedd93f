//! Edit-screen view model: organizations, budgets and the record itself,
//! fetched together.

use std::collections::{HashMap, HashSet};
use std::future::Future;

use serde::Serialize;
use tracing::{debug, warn};

use super::LeadUnitService;
use crate::http_client::ApiError;
use crate::models::{
    Budget, ContentItem, EntityId, Organization, OrganizationAssociation, PaginatedResponse,
};

/// Which organizations are ticked in the selection list.
///
/// Kept apart from [`Organization`] so the domain record stays free of UI state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    checked: HashMap<EntityId, bool>,
}

impl SelectionState {
    /// Tick each unit iff it appears in `links`.
    pub fn from_links(units: &[Organization], links: &[OrganizationAssociation]) -> Self {
        let linked: HashSet<&EntityId> =
            links.iter().map(|l| &l.organization_id).collect();
        let checked = units
            .iter()
            .map(|u| {
                (
                    u.organization_id.clone(),
                    linked.contains(&u.organization_id),
                )
            })
            .collect();
        Self { checked }
    }

    pub fn is_checked(&self, organization_id: &EntityId) -> bool {
        self.checked.get(organization_id).copied().unwrap_or(false)
    }

    pub fn set_checked(&mut self, organization_id: EntityId, checked: bool) {
        self.checked.insert(organization_id, checked);
    }

    /// Units currently ticked, in list order.
    pub fn selected<'a>(&self, units: &'a [Organization]) -> Vec<&'a Organization> {
        units
            .iter()
            .filter(|u| self.is_checked(&u.organization_id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.checked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }
}

/// Everything the edit screen needs in one value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadUnitUpdateData {
    pub units: Vec<Organization>,
    pub budgets: Vec<Budget>,
    pub detail: Option<ContentItem>,
    pub list_data_origin_drop_id: Vec<OrganizationAssociation>,
    pub selection: SelectionState,
}

impl LeadUnitService {
    /// Fetch organizations, budgets and (when `id` is given) the record,
    /// concurrently. Each branch falls back on failure so this never fails.
    pub async fn get_lead_unit_update_data(&self, id: Option<&EntityId>) -> LeadUnitUpdateData {
        let messages = self.errors().locale().messages();

        let units = self.recover(
            "organization list",
            self.get_list_unit(""),
            PaginatedResponse::empty,
            messages.units_load_failed,
        );
        let budgets = self.recover(
            "budget list",
            self.budget_common(),
            Vec::new,
            messages.budgets_load_failed,
        );
        let detail = async {
            match id {
                Some(id) => {
                    self.recover(
                        "detail",
                        async { self.get_detail(id).await.map(Some) },
                        || None,
                        messages.detail_load_failed,
                    )
                    .await
                }
                None => None,
            }
        };

        let (units, budgets, detail) = tokio::join!(units, budgets, detail);

        let units = units.content;
        let list_data_origin_drop_id = detail
            .as_ref()
            .map(|d| d.organization_details.clone())
            .unwrap_or_default();
        let selection = match &detail {
            Some(_) => SelectionState::from_links(&units, &list_data_origin_drop_id),
            None => SelectionState::default(),
        };

        debug!(
            "Loaded edit data: {} units, {} budgets, detail={}",
            units.len(),
            budgets.len(),
            detail.is_some()
        );

        LeadUnitUpdateData {
            units,
            budgets,
            detail,
            list_data_origin_drop_id,
            selection,
        }
    }

    /// Run one branch under the configured timeout; on failure show
    /// `message` and return the fallback.
    ///
    /// The wrapped operation has already reported its own error through
    /// [`LeadUnitService::intercept`]; an elapsed timeout is reported here.
    async fn recover<T, F, D>(
        &self,
        branch: &str,
        operation: F,
        fallback: D,
        message: &str,
    ) -> T
    where
        F: Future<Output = Result<T, ApiError>>,
        D: FnOnce() -> T,
    {
        let outcome = match self.branch_timeout {
            Some(limit) => match tokio::time::timeout(limit, operation).await {
                Ok(result) => result,
                Err(_) => {
                    let err = ApiError::Timeout {
                        url: branch.to_string(),
                        after: limit,
                    };
                    self.errors().handle_error(&err, None);
                    Err(err)
                }
            },
            None => operation.await,
        };

        match outcome {
            Ok(value) => value,
            Err(err) => {
                warn!("Edit data branch '{}' failed: {}", branch, err);
                self.errors().notify(message);
                fallback()
            }
        }
    }
}
