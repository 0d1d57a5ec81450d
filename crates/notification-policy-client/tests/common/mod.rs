// crates/notification-policy-client/tests/common/mod.rs
// ============================================================================
// Module: Mock Vendor API
// Description: Stateful tiny_http server emulating the alerting policies API.
// Purpose: Exercise the HTTP client and lifecycle without network access.
// Dependencies: tiny_http, serde_json
// ============================================================================

//! ## Overview
//! [`MockVendor`] serves `/client/v4/accounts/{account}/alerting/v3/policies`
//! from an in-memory map, records every request, and can be scripted to
//! return canned responses for error-path tests.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::unwrap_in_result,
    clippy::panic,
    reason = "Test fixtures favor direct unwraps for setup clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::thread::JoinHandle;

use notification_policy_client::ClientConfig;
use notification_policy_client::Credentials;
use notification_policy_client::HttpNotificationPolicyClient;
use serde_json::Value;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Request;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Request captured by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Request path including query.
    pub path: String,
    /// Lower-cased header names with values.
    pub headers: Vec<(String, String)>,
    /// Raw body.
    pub body: String,
}

impl RecordedRequest {
    /// Returns the first header value with the given lower-cased name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    /// Parses the body as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Shared server state.
#[derive(Default)]
struct VendorState {
    /// Stored policy bodies keyed by account and policy id.
    policies: BTreeMap<(String, String), Value>,
    /// Counter for ids and timestamps.
    sequence: u64,
    /// Every request received, in order.
    requests: Vec<RecordedRequest>,
    /// Canned responses served ahead of routing.
    scripted: VecDeque<(u16, String)>,
}

/// Mock vendor API server.
pub struct MockVendor {
    /// Listening server, unblocked on drop.
    server: Arc<Server>,
    /// Shared state.
    state: Arc<Mutex<VendorState>>,
    /// Accept loop thread.
    handle: Option<JoinHandle<()>>,
    /// API base URL including the `/client/v4` prefix.
    base_url: String,
}

// ============================================================================
// SECTION: Server
// ============================================================================

impl MockVendor {
    /// Starts the mock server on an ephemeral local port.
    pub fn start() -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let addr = server.server_addr().to_ip().unwrap();
        let state = Arc::new(Mutex::new(VendorState::default()));
        let handle = {
            let server = Arc::clone(&server);
            let state = Arc::clone(&state);
            thread::spawn(move || {
                for request in server.incoming_requests() {
                    handle_request(&state, request);
                }
            })
        };
        Self {
            server,
            state,
            handle: Some(handle),
            base_url: format!("http://{addr}/client/v4"),
        }
    }

    /// Returns the API base URL served by the mock.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns a client configuration pointing at the mock.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            allow_http: true,
            timeout_ms: 5_000,
            ..ClientConfig::new(Credentials::ApiToken("test-token".to_string()))
        }
    }

    /// Returns a client pointing at the mock.
    pub fn client(&self) -> HttpNotificationPolicyClient {
        HttpNotificationPolicyClient::new(&self.client_config()).unwrap()
    }

    /// Queues a canned response served before normal routing.
    pub fn script(&self, status: u16, body: impl Into<String>) {
        self.state.lock().unwrap().scripted.push_back((status, body.into()));
    }

    /// Returns all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Returns the stored policy body, if present.
    pub fn stored(&self, account: &str, id: &str) -> Option<Value> {
        self.state.lock().unwrap().policies.get(&(account.to_string(), id.to_string())).cloned()
    }

    /// Returns the number of stored policies.
    pub fn stored_count(&self) -> usize {
        self.state.lock().unwrap().policies.len()
    }
}

impl Drop for MockVendor {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

// ============================================================================
// SECTION: Routing
// ============================================================================

/// Records a request and responds from the script or the router.
fn handle_request(state: &Arc<Mutex<VendorState>>, mut request: Request) {
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);
    let recorded = RecordedRequest {
        method: request.method().as_str().to_string(),
        path: request.url().to_string(),
        headers: request
            .headers()
            .iter()
            .map(|header| {
                (header.field.as_str().as_str().to_ascii_lowercase(), header.value.to_string())
            })
            .collect(),
        body,
    };
    let (status, payload) = {
        let mut state = state.lock().unwrap();
        state.requests.push(recorded.clone());
        match state.scripted.pop_front() {
            Some(scripted) => scripted,
            None => route(&mut state, &recorded),
        }
    };
    let response = Response::from_string(payload)
        .with_status_code(status)
        .with_header(Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap());
    let _ = request.respond(response);
}

/// Routes a request against the stored policies.
fn route(state: &mut VendorState, request: &RecordedRequest) -> (u16, String) {
    let segments: Vec<&str> = request.path.trim_start_matches('/').split('/').collect();
    let (account, policy) = match segments.as_slice() {
        ["client", "v4", "accounts", account, "alerting", "v3", "policies"] => (*account, None),
        ["client", "v4", "accounts", account, "alerting", "v3", "policies", policy] => {
            (*account, Some(*policy))
        }
        _ => return failure(404, 7000, "no route for that uri"),
    };
    match (request.method.as_str(), policy) {
        ("POST", None) => {
            state.sequence += 1;
            let id = format!("{:032x}", state.sequence);
            let mut body = request.json();
            body["id"] = json!(id);
            body["created"] = json!(format!("2021-05-04T21:15:{:02}Z", state.sequence % 60));
            body["modified"] = body["created"].clone();
            state.policies.insert((account.to_string(), id.clone()), body);
            success(&json!({"id": id}))
        }
        ("GET", Some(policy)) => match state.policies.get(&(account.to_string(), policy.to_string())) {
            Some(stored) => success(stored),
            None => failure(404, 1003, "alerting policy not found"),
        },
        ("PUT", Some(policy)) => {
            state.sequence += 1;
            let key = (account.to_string(), policy.to_string());
            let Some(existing) = state.policies.get(&key).cloned() else {
                return failure(404, 1003, "alerting policy not found");
            };
            let mut body = request.json();
            body["id"] = json!(policy);
            body["created"] = existing["created"].clone();
            body["modified"] = json!(format!("2021-05-05T10:00:{:02}Z", state.sequence % 60));
            state.policies.insert(key, body);
            success(&json!({"id": policy}))
        }
        ("DELETE", Some(policy)) => {
            if state.policies.remove(&(account.to_string(), policy.to_string())).is_some() {
                (200, json!({"success": true, "errors": [], "messages": []}).to_string())
            } else {
                failure(404, 1003, "alerting policy not found")
            }
        }
        _ => failure(405, 10000, "method not allowed"),
    }
}

/// Builds a success envelope.
fn success(result: &Value) -> (u16, String) {
    (200, json!({"success": true, "errors": [], "messages": [], "result": result}).to_string())
}

/// Builds a failure envelope.
fn failure(status: u16, code: i64, message: &str) -> (u16, String) {
    let body = json!({
        "success": false,
        "errors": [{"code": code, "message": message}],
        "messages": [],
        "result": null,
    });
    (status, body.to_string())
}
