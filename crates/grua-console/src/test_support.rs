use std::cell::RefCell;

use serde_json::Value;

use crate::client::{ApiRequest, ApiResponse, ConsoleClient, Method, Transport};
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result};

pub(crate) const TEST_BASE_URL: &str = "http://grua.test";
pub(crate) const TEST_CSRF_TOKEN: &str = "csrf-test-token";

enum Reply {
    Respond(ApiResponse),
    Unreachable,
}

/// Answers requests from a fixed route table and records what was sent.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    routes: RefCell<Vec<(Method, String, Reply)>>,
    sent: RefCell<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// `path` is matched against the end of the URL, ignoring the query.
    pub(crate) fn on(self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self.routes.borrow_mut().push((
            method,
            path.to_string(),
            Reply::Respond(ApiResponse {
                status,
                body: body.to_string(),
            }),
        ));
        self
    }

    pub(crate) fn on_text(self, method: Method, path: &str, status: u16, body: &str) -> Self {
        self.routes.borrow_mut().push((
            method,
            path.to_string(),
            Reply::Respond(ApiResponse {
                status,
                body: body.to_string(),
            }),
        ));
        self
    }

    pub(crate) fn unreachable(self, method: Method, path: &str) -> Self {
        self.routes
            .borrow_mut()
            .push((method, path.to_string(), Reply::Unreachable));
        self
    }

    pub(crate) fn sent(&self) -> Vec<ApiRequest> {
        self.sent.borrow().clone()
    }

    pub(crate) fn last_body(&self, method: Method) -> Option<Value> {
        self.sent
            .borrow()
            .iter()
            .rev()
            .find(|request| request.method == method)
            .and_then(|request| request.body.clone())
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.sent.borrow_mut().push(request.clone());
        let routes = self.routes.borrow();
        let reply = routes
            .iter()
            .find(|(method, path, _)| *method == request.method && request.url.ends_with(path))
            .map(|(_, _, reply)| reply);
        match reply {
            Some(Reply::Respond(response)) => Ok(response.clone()),
            Some(Reply::Unreachable) => Err(ConsoleError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "scripted transport failure",
            ))),
            None => Ok(ApiResponse {
                status: 404,
                body: "{\"detail\": [\"Not found.\"]}".to_string(),
            }),
        }
    }
}

pub(crate) fn test_config() -> ConsoleConfig {
    ConsoleConfig {
        base_url: TEST_BASE_URL.to_string(),
        csrf_token: Some(TEST_CSRF_TOKEN.to_string()),
        ..ConsoleConfig::default()
    }
}

pub(crate) fn client(transport: ScriptedTransport) -> ConsoleClient<ScriptedTransport> {
    ConsoleClient::new(test_config(), transport)
}
