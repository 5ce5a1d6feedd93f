#![cfg(test)]
//! Scripted transport for exercising the service without a network.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::http_client::{ApiError, ApiRequest, HttpResponse, Method, Transport};
use crate::services::{Endpoints, ErrorHandler, LeadUnitService, Locale, MemoryNotifier};

pub const API_URL: &str = "http://pams.test/common";
pub const ADMIN_URL: &str = "http://pams.test/admin";

enum Reply {
    Json(Value),
    File(Vec<u8>, Vec<(String, String)>),
    Fail(ApiError),
    Hang,
}

struct Route {
    method: Method,
    path: String,
    reply: Reply,
}

/// Answers requests whose path contains a registered fragment.
/// Unmatched requests fail with 404.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn route(self, method: Method, path: &str, reply: Reply) -> Self {
        self.routes.lock().unwrap().push(Route {
            method,
            path: path.to_string(),
            reply,
        });
        self
    }

    pub fn on_json(self, method: Method, path: &str, body: Value) -> Self {
        self.route(method, path, Reply::Json(body))
    }

    pub fn on_error(self, method: Method, path: &str, err: ApiError) -> Self {
        self.route(method, path, Reply::Fail(err))
    }

    pub fn on_file(self, method: Method, path: &str, bytes: &[u8], headers: &[(&str, &str)]) -> Self {
        let headers = headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.route(method, path, Reply::File(bytes.to_vec(), headers))
    }

    pub fn on_hang(self, method: Method, path: &str) -> Self {
        self.route(method, path, Reply::Hang)
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().iter().map(ApiRequest::url).collect()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, request: ApiRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        let url = request.url();

        let reply = {
            let routes = self.routes.lock().unwrap();
            routes
                .iter()
                .find(|r| r.method == request.method && request.path.contains(&r.path))
                .map(|r| match &r.reply {
                    Reply::Json(v) => Reply::Json(v.clone()),
                    Reply::File(b, h) => Reply::File(b.clone(), h.clone()),
                    Reply::Fail(e) => Reply::Fail(e.clone()),
                    Reply::Hang => Reply::Hang,
                })
        };

        match reply {
            Some(Reply::Json(body)) => Ok(HttpResponse::new(
                StatusCode::OK,
                url,
                serde_json::to_vec(&body).unwrap(),
            )),
            Some(Reply::File(bytes, headers)) => {
                let mut resp = HttpResponse::new(StatusCode::OK, url, bytes);
                for (k, v) in &headers {
                    resp = resp.with_header(k, v);
                }
                Ok(resp)
            }
            Some(Reply::Fail(err)) => Err(err),
            Some(Reply::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Err(ApiError::from_status(StatusCode::NOT_FOUND, &url, b"")),
        }
    }
}

/// Service wired to `transport`, with notifications captured.
pub fn service(transport: Arc<FakeTransport>) -> (LeadUnitService, Arc<MemoryNotifier>) {
    let notifier = Arc::new(MemoryNotifier::new());
    let errors = ErrorHandler::new(notifier.clone(), Locale::En);
    let endpoints = Endpoints {
        api_url: API_URL.to_string(),
        admin_url: ADMIN_URL.to_string(),
    };
    (LeadUnitService::new(transport, errors, endpoints), notifier)
}
