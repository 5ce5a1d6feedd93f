//! Record service for lead units.
//!
//! One method per backend endpoint. Every call goes through [`LeadUnitService::intercept`],
//! which reports failures to the [`ErrorHandler`] and hands the untouched
//! error back to the caller.

mod export;
mod payload;
mod update_data;

pub use export::{
    decode_spreadsheet, save_error_workbook, Blob, DirectorySink, ExportError, FileSink,
    IMPORT_ERROR_FILENAME, SPREADSHEET_MIME,
};
pub use payload::{build_lead_unit_payload, build_payload_to_send};
pub use update_data::{LeadUnitUpdateData, SelectionState};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::ErrorHandler;
use crate::http_client::{ApiError, ApiRequest, FileDownload, Transport};
use crate::models::{
    Budget, ContentItem, EntityId, Envelope, LeadUnitPayload, Organization, PaginatedResponse,
    SaveMode, SearchPayload,
};

const RECORDS_PATH: &str = "/v1.0/risk-focal-units";
const BUDGET_PATH: &str = "/v1.0/budget/category-ancestor-code";
const ORGANIZATION_PATH: &str = "/organization/searchOrganizationLevel";

/// Fixed filter for the budget reference list.
const BUDGET_FILTER: &[(&str, &str)] = &[
    ("flexValueSetName", "PAM_COA_BUDGET_ROOT_LEVEL_BANK"),
    ("transactionCateg", "CONTRACT"),
    ("page", "0"),
    ("size", "10000"),
    ("hideLoading", "true"),
];

/// Base URLs the service talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Lead unit and budget endpoints.
    pub api_url: String,
    /// Organization directory.
    pub admin_url: String,
}

/// Client for the lead unit endpoints.
#[derive(Clone)]
pub struct LeadUnitService {
    transport: Arc<dyn Transport>,
    errors: ErrorHandler,
    endpoints: Endpoints,
    branch_timeout: Option<Duration>,
}

impl LeadUnitService {
    pub fn new(transport: Arc<dyn Transport>, errors: ErrorHandler, endpoints: Endpoints) -> Self {
        Self {
            transport,
            errors,
            endpoints,
            branch_timeout: None,
        }
    }

    /// Bound each edit-screen fetch; an elapsed bound counts as a failure.
    pub fn with_branch_timeout(mut self, timeout: Duration) -> Self {
        self.branch_timeout = Some(timeout);
        self
    }

    pub fn errors(&self) -> &ErrorHandler {
        &self.errors
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Report a failure to the error handler and pass it through unchanged.
    pub async fn intercept<T, F>(&self, operation: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        operation.await.map_err(|err| {
            self.errors.handle_error(&err, None);
            err
        })
    }

    fn records_path(&self, suffix: &str) -> String {
        format!("{}/{}", RECORDS_PATH, suffix)
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ApiError> {
        let response = self.transport.execute(request).await?;
        response.json()
    }

    /// Search records; `data` is unwrapped from the envelope.
    pub async fn search(
        &self,
        params: &SearchPayload,
    ) -> Result<PaginatedResponse<ContentItem>, ApiError> {
        self.intercept(async {
            if params.size == 0 {
                return Err(ApiError::Validation("page size must be positive".into()));
            }
            let request = ApiRequest::get(&self.endpoints.api_url, &self.records_path("search"))
                .params(params.to_query());
            let envelope: Envelope<PaginatedResponse<ContentItem>> =
                self.send_json(request).await?;
            Ok(envelope.into_data().unwrap_or_default())
        })
        .await
    }

    /// Budget categories available for selection.
    pub async fn budget_common(&self) -> Result<Vec<Budget>, ApiError> {
        self.intercept(async {
            let request = ApiRequest::get(&self.endpoints.api_url, BUDGET_PATH).params(
                BUDGET_FILTER
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string())),
            );
            let envelope: Envelope<PaginatedResponse<Budget>> = self.send_json(request).await?;
            Ok(envelope.into_data().map(|page| page.content).unwrap_or_default())
        })
        .await
    }

    pub async fn delete_by_id(&self, id: &EntityId) -> Result<Value, ApiError> {
        self.intercept(async {
            let request = ApiRequest::delete(
                &self.endpoints.api_url,
                &self.records_path(&id.to_string()),
            );
            self.send_json(request).await
        })
        .await
    }

    /// Delete action from the list screen.
    pub async fn process_delete_action(&self, id: &EntityId) -> Result<Value, ApiError> {
        self.delete_by_id(id).await
    }

    /// Commit a previously uploaded import identified by `key`.
    pub async fn confirm_source(&self, key: &str) -> Result<Value, ApiError> {
        self.intercept(async {
            let request = ApiRequest::post(
                &self.endpoints.api_url,
                &self.records_path("submit-import"),
            )
            .param("key", key);
            self.send_json(request).await
        })
        .await
    }

    /// Download the spreadsheet export for a filter.
    pub async fn export<F: Serialize + Sync>(&self, filter: &F) -> Result<FileDownload, ApiError> {
        self.intercept(async {
            let request = ApiRequest::post(&self.endpoints.api_url, &self.records_path("export"))
                .json(filter)?
                .file();
            let response = self.transport.execute(request).await?;
            let file = response.into_file();
            info!("Exported {} bytes", file.bytes.len());
            Ok(file)
        })
        .await
    }

    /// Upload parsed spreadsheet rows for validation.
    pub async fn import_excel_data<P: Serialize + Sync>(
        &self,
        payload: &P,
    ) -> Result<Value, ApiError> {
        self.intercept(async {
            let request = ApiRequest::post(
                &self.endpoints.api_url,
                &self.records_path("import-excel-data"),
            )
            .json(payload)?;
            self.send_json(request).await
        })
        .await
    }

    /// Level-1 organizations matching `search`.
    pub async fn get_list_unit(
        &self,
        search: &str,
    ) -> Result<PaginatedResponse<Organization>, ApiError> {
        self.intercept(async {
            let request = ApiRequest::get(&self.endpoints.admin_url, ORGANIZATION_PATH)
                .param("code", "")
                .param("hrisOrganizationId", "")
                .param("search", search)
                .param("level", 1)
                .param("page", 0)
                .param("size", 10000);
            let url = request.url();
            let value: Value = self.send_json(request).await?;
            // The organization directory sometimes wraps its page in `data`
            let page = match value.get("data") {
                Some(data) if data.get("content").is_some() => data.clone(),
                _ => value,
            };
            serde_json::from_value(page).map_err(|e| ApiError::Decode {
                url,
                reason: e.to_string(),
            })
        })
        .await
    }

    /// One record with its organization links.
    pub async fn get_detail(&self, id: &EntityId) -> Result<ContentItem, ApiError> {
        self.intercept(async {
            let request = ApiRequest::get(
                &self.endpoints.api_url,
                &self.records_path(&format!("detail/{}", id)),
            );
            let url = request.url();
            let envelope: Envelope<ContentItem> = self.send_json(request).await?;
            envelope.into_data().ok_or_else(|| ApiError::Decode {
                url,
                reason: "response has no data".to_string(),
            })
        })
        .await
    }

    /// Create (add) or update (edit) a record. Updates address `payload.id`.
    pub async fn save_update(
        &self,
        payload: &LeadUnitPayload,
        mode: SaveMode,
    ) -> Result<Value, ApiError> {
        self.intercept(async {
            let request = match mode {
                SaveMode::Add => {
                    ApiRequest::post(&self.endpoints.api_url, &self.records_path("create"))
                }
                SaveMode::Edit => {
                    let id = payload.id.as_ref().ok_or_else(|| {
                        ApiError::Validation("an id is required to update a record".into())
                    })?;
                    ApiRequest::put(
                        &self.endpoints.api_url,
                        &self.records_path(&format!("update/{}", id)),
                    )
                }
            }
            .json(payload)?;
            debug!("Saving lead unit ({})", mode.as_str());
            self.send_json(request).await
        })
        .await
    }
}

/// Extract the confirmation key from an import response (`data.key`).
pub fn import_key(response: &Value) -> Option<&str> {
    response
        .pointer("/data/key")
        .and_then(Value::as_str)
        .filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests;
