use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::json;

use super::*;
use crate::http_client::Method;
use crate::test_support::{service, FakeTransport, ADMIN_URL, API_URL};

fn page(content: serde_json::Value) -> serde_json::Value {
    json!({"content": content, "totalElements": 2, "number": 0})
}

fn server_error(message: &str) -> ApiError {
    ApiError::from_status(
        StatusCode::INTERNAL_SERVER_ERROR,
        "http://pams.test",
        json!({"message": message}).to_string().as_bytes(),
    )
}

#[tokio::test]
async fn test_search_encodes_query_and_unwraps_data() {
    let transport = Arc::new(FakeTransport::new().on_json(
        Method::Get,
        "/risk-focal-units/search",
        json!({"data": page(json!([{"id": 1, "name": "Unit"}]))}),
    ));
    let (svc, notes) = service(transport.clone());

    let params = SearchPayload {
        search: "test search".into(),
        status: Some(1),
        size: 10,
        page: 0,
    };
    let result = svc.search(&params).await.unwrap();

    assert_eq!(result.content.len(), 1);
    assert_eq!(result.total_elements, 2);
    assert_eq!(
        transport.urls(),
        vec![format!(
            "{}/v1.0/risk-focal-units/search?search=test%20search&status=1&size=10&page=0",
            API_URL
        )]
    );
    assert!(notes.messages().is_empty());
}

#[tokio::test]
async fn test_search_without_status_and_failure_is_passed_through() {
    let transport = Arc::new(FakeTransport::new().on_error(
        Method::Get,
        "/risk-focal-units/search",
        ApiError::Text("Simulated network error".into()),
    ));
    let (svc, notes) = service(transport.clone());

    let params = SearchPayload {
        search: "test".into(),
        status: None,
        size: 10,
        page: 0,
    };
    let err = svc.search(&params).await.unwrap_err();

    assert!(matches!(err, ApiError::Text(ref m) if m == "Simulated network error"));
    assert_eq!(notes.messages(), vec!["Simulated network error"]);
    assert_eq!(
        transport.urls(),
        vec![format!(
            "{}/v1.0/risk-focal-units/search?search=test&size=10&page=0",
            API_URL
        )]
    );
}

#[tokio::test]
async fn test_search_rejects_zero_page_size() {
    let transport = Arc::new(FakeTransport::new());
    let (svc, notes) = service(transport.clone());
    let params = SearchPayload {
        size: 0,
        ..SearchPayload::default()
    };

    let err = svc.search(&params).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(transport.requests().is_empty());
    assert_eq!(notes.messages().len(), 1);
}

#[tokio::test]
async fn test_budget_common_unwraps_content() {
    let transport = Arc::new(FakeTransport::new().on_json(
        Method::Get,
        "/budget/category-ancestor-code",
        json!({"data": page(json!([{"code": "B1"}, {"code": "B2"}]))}),
    ));
    let (svc, _) = service(transport.clone());

    let budgets = svc.budget_common().await.unwrap();
    assert_eq!(budgets.len(), 2);
    assert_eq!(budgets[0].code.as_deref(), Some("B1"));
    assert_eq!(
        transport.urls()[0],
        format!(
            "{}/v1.0/budget/category-ancestor-code?flexValueSetName=PAM_COA_BUDGET_ROOT_LEVEL_BANK&transactionCateg=CONTRACT&page=0&size=10000&hideLoading=true",
            API_URL
        )
    );
}

#[tokio::test]
async fn test_budget_common_missing_data_is_empty() {
    let transport = Arc::new(FakeTransport::new().on_json(
        Method::Get,
        "/budget/category-ancestor-code",
        json!({"data": null}),
    ));
    let (svc, _) = service(transport);
    assert!(svc.budget_common().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_by_id() {
    let transport = Arc::new(FakeTransport::new().on_json(
        Method::Delete,
        "/risk-focal-units/123",
        json!({"success": true}),
    ));
    let (svc, _) = service(transport.clone());

    let resp = svc.process_delete_action(&EntityId::Number(123)).await.unwrap();
    assert_eq!(resp, json!({"success": true}));
    assert_eq!(transport.requests()[0].method, Method::Delete);
    assert_eq!(
        transport.urls()[0],
        format!("{}/v1.0/risk-focal-units/123", API_URL)
    );
}

#[tokio::test]
async fn test_delete_failure_reports_backend_message() {
    let transport = Arc::new(FakeTransport::new().on_error(
        Method::Delete,
        "/risk-focal-units/",
        server_error("Record is in use"),
    ));
    let (svc, notes) = service(transport);

    let err = svc.delete_by_id(&EntityId::Number(5)).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(notes.messages(), vec!["Record is in use"]);
}

#[tokio::test]
async fn test_import_then_confirm() {
    let transport = Arc::new(
        FakeTransport::new()
            .on_json(
                Method::Post,
                "/import-excel-data",
                json!({"data": {"key": "imp-42", "errors": 0}}),
            )
            .on_json(Method::Post, "/submit-import", json!({"success": true})),
    );
    let (svc, _) = service(transport.clone());

    let rows = json!({"rows": [{"code": "LU1"}]});
    let response = svc.import_excel_data(&rows).await.unwrap();
    let key = import_key(&response).unwrap();
    svc.confirm_source(key).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].body, Some(rows));
    assert_eq!(
        requests[1].url(),
        format!("{}/v1.0/risk-focal-units/submit-import?key=imp-42", API_URL)
    );
    assert_eq!(requests[1].body, None);
}

#[test]
fn test_import_key_missing() {
    assert_eq!(import_key(&json!({"data": {}})), None);
    assert_eq!(import_key(&json!({"data": {"key": ""}})), None);
}

#[tokio::test]
async fn test_export_returns_file() {
    let transport = Arc::new(FakeTransport::new().on_file(
        Method::Post,
        "/risk-focal-units/export",
        b"PK\x03\x04",
        &[("content-disposition", "attachment; filename=\"units.xlsx\"")],
    ));
    let (svc, _) = service(transport.clone());

    let filter = json!({"search": "test", "status": 1});
    let file = svc.export(&filter).await.unwrap();

    assert_eq!(file.bytes, b"PK\x03\x04");
    assert_eq!(file.filename.as_deref(), Some("units.xlsx"));
    let request = &transport.requests()[0];
    assert!(request.file);
    assert_eq!(request.body, Some(filter));
}

#[tokio::test]
async fn test_get_list_unit_uses_admin_url() {
    let transport = Arc::new(FakeTransport::new().on_json(
        Method::Get,
        "/organization/searchOrganizationLevel",
        page(json!([{"organizationId": 10, "name": "Branch A"}])),
    ));
    let (svc, _) = service(transport.clone());

    let units = svc.get_list_unit("hà nội").await.unwrap();
    assert_eq!(units.content[0].organization_id, EntityId::Number(10));
    assert_eq!(
        transport.urls()[0],
        format!(
            "{}/organization/searchOrganizationLevel?code=&hrisOrganizationId=&search=h%C3%A0%20n%E1%BB%99i&level=1&page=0&size=10000",
            ADMIN_URL
        )
    );
}

#[tokio::test]
async fn test_get_list_unit_accepts_enveloped_page() {
    let transport = Arc::new(FakeTransport::new().on_json(
        Method::Get,
        "/organization/searchOrganizationLevel",
        json!({"data": page(json!([{"organizationId": "A"}]))}),
    ));
    let (svc, _) = service(transport);
    let units = svc.get_list_unit("").await.unwrap();
    assert_eq!(units.content[0].organization_id, EntityId::from("A"));
}

#[tokio::test]
async fn test_get_detail_unwraps_data() {
    let transport = Arc::new(FakeTransport::new().on_json(
        Method::Get,
        "/risk-focal-units/detail/456",
        json!({"data": {"id": 456, "organizationDetails": []}}),
    ));
    let (svc, _) = service(transport);

    let detail = svc.get_detail(&EntityId::Number(456)).await.unwrap();
    assert_eq!(detail.id, Some(EntityId::Number(456)));
}

#[tokio::test]
async fn test_get_detail_without_data_is_decode_error() {
    let transport = Arc::new(FakeTransport::new().on_json(
        Method::Get,
        "/risk-focal-units/detail/1",
        json!({}),
    ));
    let (svc, notes) = service(transport);

    let err = svc.get_detail(&EntityId::Number(1)).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
    assert_eq!(notes.messages().len(), 1);
}

fn payload(id: Option<i64>) -> LeadUnitPayload {
    LeadUnitPayload {
        id: id.map(EntityId::Number),
        start_date: "14/05/2025".into(),
        end_date: String::new(),
        organization_details: Some(Vec::new()),
        fields: serde_json::Map::new(),
    }
}

#[tokio::test]
async fn test_save_add_posts_to_create() {
    let transport = Arc::new(FakeTransport::new().on_json(
        Method::Post,
        "/risk-focal-units/create",
        json!({"success": true}),
    ));
    let (svc, _) = service(transport.clone());

    svc.save_update(&payload(None), SaveMode::Add).await.unwrap();
    assert_eq!(
        transport.urls()[0],
        format!("{}/v1.0/risk-focal-units/create", API_URL)
    );
}

#[tokio::test]
async fn test_save_edit_puts_to_update() {
    let transport = Arc::new(FakeTransport::new().on_json(
        Method::Put,
        "/risk-focal-units/update/7",
        json!({"success": true}),
    ));
    let (svc, _) = service(transport.clone());

    svc.save_update(&payload(Some(7)), SaveMode::Edit)
        .await
        .unwrap();
    let request = &transport.requests()[0];
    assert_eq!(request.method, Method::Put);
    assert_eq!(request.body.as_ref().unwrap()["id"], json!(7));
}

#[tokio::test]
async fn test_save_edit_without_id_fails_before_sending() {
    let transport = Arc::new(FakeTransport::new());
    let (svc, notes) = service(transport.clone());

    let err = svc
        .save_update(&payload(None), SaveMode::Edit)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(transport.requests().is_empty());
    assert_eq!(notes.messages().len(), 1);
}

fn edit_screen_transport() -> FakeTransport {
    FakeTransport::new()
        .on_json(
            Method::Get,
            "/budget/category-ancestor-code",
            json!({"data": page(json!([{"code": "B1"}]))}),
        )
        .on_json(
            Method::Get,
            "/risk-focal-units/detail/9",
            json!({"data": {
                "id": 9,
                "organizationDetails": [
                    {"id": 1, "organizationId": "A", "deleted": 0},
                    {"id": 2, "organizationId": "Z", "deleted": 0}
                ]
            }}),
        )
}

#[tokio::test]
async fn test_update_data_marks_linked_units() {
    let transport = Arc::new(edit_screen_transport().on_json(
        Method::Get,
        "/organization/searchOrganizationLevel",
        page(json!([{"organizationId": "A"}, {"organizationId": "B"}])),
    ));
    let (svc, notes) = service(transport);

    let data = svc
        .get_lead_unit_update_data(Some(&EntityId::Number(9)))
        .await;

    assert_eq!(data.units.len(), 2);
    assert!(data.selection.is_checked(&EntityId::from("A")));
    assert!(!data.selection.is_checked(&EntityId::from("B")));
    assert_eq!(data.selection.selected(&data.units).len(), 1);
    assert_eq!(data.list_data_origin_drop_id.len(), 2);
    assert_eq!(data.budgets.len(), 1);
    assert!(notes.messages().is_empty());
}

#[tokio::test]
async fn test_update_data_survives_organization_failure() {
    let transport = Arc::new(edit_screen_transport().on_error(
        Method::Get,
        "/organization/searchOrganizationLevel",
        server_error("directory down"),
    ));
    let (svc, notes) = service(transport);

    let data = svc
        .get_lead_unit_update_data(Some(&EntityId::Number(9)))
        .await;

    assert!(data.units.is_empty());
    assert_eq!(data.budgets.len(), 1);
    assert!(data.detail.is_some());
    assert_eq!(data.list_data_origin_drop_id.len(), 2);
    assert_eq!(
        notes.messages(),
        vec!["directory down", "Error loading organization list!"]
    );
}

#[tokio::test]
async fn test_update_data_all_branches_fail() {
    let transport = Arc::new(FakeTransport::new());
    let (svc, notes) = service(transport);

    let data = svc
        .get_lead_unit_update_data(Some(&EntityId::Number(3)))
        .await;

    assert_eq!(data, LeadUnitUpdateData::default());
    let messages = notes.messages();
    assert_eq!(messages.len(), 6);
    assert!(messages.contains(&"Error loading budget information!".to_string()));
    assert!(messages.contains(&"Error loading unit details!".to_string()));
}

#[tokio::test]
async fn test_update_data_without_id_skips_detail() {
    let transport = Arc::new(edit_screen_transport().on_json(
        Method::Get,
        "/organization/searchOrganizationLevel",
        page(json!([{"organizationId": "A"}])),
    ));
    let (svc, _) = service(transport.clone());

    let data = svc.get_lead_unit_update_data(None).await;

    assert!(data.detail.is_none());
    assert!(data.list_data_origin_drop_id.is_empty());
    assert!(data.selection.is_empty());
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_update_data_branch_timeout() {
    let transport = Arc::new(
        edit_screen_transport().on_hang(Method::Get, "/organization/searchOrganizationLevel"),
    );
    let (svc, notes) = service(transport);
    let svc = svc.with_branch_timeout(Duration::from_millis(50));

    let data = svc
        .get_lead_unit_update_data(Some(&EntityId::Number(9)))
        .await;

    assert!(data.units.is_empty());
    assert!(data.detail.is_some());
    let messages = notes.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(
        messages[0],
        "Request to organization list timed out after 50ms"
    );
    assert_eq!(messages[1], "Error loading organization list!");
}
