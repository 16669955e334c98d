//! 测试用的内存传输层
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde_json::{json, Value};
use tokio::sync::Notify;

use polly_triage::triage::api::{BaseUrls, FetchError, HttpRequest, HttpResponse, HttpTransport};
use polly_triage::TriageSession;

#[derive(Clone)]
enum Route {
    Body(u16, Vec<u8>),
    Fail(String),
}

#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<String, Route>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

fn route_key(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 2xx + JSON
    pub fn ok(&self, path: &str, body: Value) {
        self.status(path, 200, body);
    }

    pub fn status(&self, path: &str, status: u16, body: Value) {
        self.raw(path, status, &body.to_string());
    }

    pub fn raw(&self, path: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), Route::Body(status, body.as_bytes().to_vec()));
    }

    /// 模拟连接失败
    pub fn fail(&self, path: &str, message: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), Route::Fail(message.to_string()));
    }

    /// 下一次请求该路径时挂起，直到返回的 Notify 被触发
    pub fn gate(&self, path: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(path.to_string(), notify.clone());
        notify
    }

    pub fn requested_paths(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| route_key(&r.url))
            .collect()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.requested_paths()
            .iter()
            .filter(|p| p.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let key = route_key(&request.url);
        self.requests.lock().unwrap().push(request);

        let gate = self.gates.lock().unwrap().remove(&key);
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let route = self.routes.lock().unwrap().get(&key).cloned();
        match route {
            Some(Route::Body(status, body)) => Ok(HttpResponse {
                status,
                status_text: StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or_default()
                    .to_string(),
                body,
            }),
            Some(Route::Fail(message)) => Err(FetchError::transport(message)),
            None => Ok(HttpResponse {
                status: 404,
                status_text: "Not Found".to_string(),
                body: json!({"detail": format!("no route for {}", key)})
                    .to_string()
                    .into_bytes(),
            }),
        }
    }
}

pub fn session(transport: &Arc<FakeTransport>) -> TriageSession {
    TriageSession::new(transport.clone(), BaseUrls::default())
}

pub const CHANGESETS: &str = "/api/v2/changesets/?pageSize=3";

pub fn rates_path(changeset_id: &str) -> String {
    format!("/api/v2/pe/rates/?changesetId={}", changeset_id)
}

pub fn loan_path(loan_id: &str) -> String {
    format!("/api/v2/loans/{}/", loan_id)
}

pub fn lock_requests_path(loan_id: &str) -> String {
    format!("/api/v2/pe/loans/{}/lock-requests/", loan_id)
}

pub fn pricing_path(pe_request_id: &str) -> String {
    format!("/api/v2/pe/pricing-scenarios/{}/", pe_request_id)
}

pub fn changesets_body() -> Value {
    json!({
        "total": 2,
        "changesets": [
            {"id": "cs-old", "name": "January", "details": {"status": "Inactive", "publishedAt": "2024-01-10T00:00:00Z"}},
            {"id": "cs-new", "name": "March", "details": {"status": "Active", "publishedAt": "2024-03-10T00:00:00Z"},
             "versionInfo": {"basedOnId": "cs-old", "additionsToBase": 3}}
        ],
        "nextPage": null
    })
}

pub fn rates_body(changeset_id: &str) -> Value {
    json!({"data": {"total": 1, "items": [
        {"id": format!("rs-{}", changeset_id), "changesetId": changeset_id, "isPublished": true}
    ]}})
}

pub fn scenario_body(fico: u32, product_codes: &[&str]) -> Value {
    json!({
        "changesetId": "cs-new",
        "borrower": {"firstName": "Ada", "lastName": "Lovelace", "fico": fico, "annualIncome": "120000"},
        "loan": {"amount": 350000, "purpose": "Purchase", "ltv": 80},
        "property": {"state": "TX", "occupancy": "PrimaryResidence"},
        "search": {"desiredLockPeriod": 30, "productCodes": product_codes, "loanTypes": ["Conventional"]}
    })
}

pub fn lock_body(id: i64, requested_on: &str, pe_request_id: &str) -> Value {
    json!({
        "id": id,
        "requestedOn": requested_on,
        "requestedBy": "loan officer",
        "action": "Lock",
        "buySide": {"peRequestId": pe_request_id, "rate": 6.5, "lockPeriod": 30}
    })
}
