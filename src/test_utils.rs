// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use crate::types::DeploymentTemplate;
use http::{Request, Response};
use http_body_util::BodyExt;
use k8s_openapi::api::apps::v1::Deployment;
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// Pseudo-method under which watch requests (`?watch=true`) are matched
const WATCH: &str = "WATCH";

/// How the mock answers a request
#[derive(Debug, Clone)]
enum Reply {
    Respond(u16, String),
    /// The connection drops before a response arrives
    Fail,
    /// No response ever arrives
    Hang,
}

type Responses = HashMap<(String, String), VecDeque<Reply>>;

/// A request seen by the mock, with its body decoded as UTF-8
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: String,
}

/// A mock HTTP service that returns predefined responses based on request paths.
///
/// Registering several responses for the same method and path queues them;
/// the last one keeps answering once the queue is drained.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<Responses>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn reply(self, method: &str, path: &str, reply: Reply) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.reply(method, path, Reply::Respond(status, body.to_string()))
    }

    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    /// Add a watch response; `body` is newline-delimited watch events
    pub fn on_watch(self, path: &str, body: &str) -> Self {
        self.on(WATCH, path, 200, body)
    }

    /// Make the next watch request fail at the transport level
    pub fn fail_watch(self, path: &str) -> Self {
        self.reply(WATCH, path, Reply::Fail)
    }

    /// Make the next watch request hang without ever answering
    pub fn hang_watch(self, path: &str) -> Self {
        self.reply(WATCH, path, Reply::Hang)
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// All requests received so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests received for a method, e.g. "PUT" or "WATCH"
    pub fn requests_for(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }

    fn find_response(&self, method: &str, path: &str) -> Option<Reply> {
        let mut responses = self.responses.lock().unwrap();

        let key = match responses.get(&(method.to_string(), path.to_string())) {
            Some(_) => Some((method.to_string(), path.to_string())),
            // Fall back to a prefix match for paths like /api/v1/namespaces/foo
            None => responses
                .keys()
                .find(|(m, p)| m == method && path.starts_with(p.as_str()))
                .cloned(),
        }?;

        let queue = responses.get_mut(&key)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let query = req.uri().query().map(str::to_string);
        let is_watch = query
            .as_deref()
            .is_some_and(|q| q.split('&').any(|kv| kv == "watch=true"));
        let method = if is_watch {
            WATCH.to_string()
        } else {
            req.method().to_string()
        };
        let path = req.uri().path().to_string();

        let response = self.find_response(&method, &path);
        let requests = self.requests.clone();

        Box::pin(async move {
            let body = req.into_body().collect().await?.to_bytes();
            requests.lock().unwrap().push(RecordedRequest {
                method,
                path,
                query,
                body: String::from_utf8_lossy(&body).into_owned(),
            });

            let (status, body) = match response {
                Some(Reply::Respond(status, body)) => (status, body),
                Some(Reply::Fail) => return Err(tower::BoxError::from("connection reset by peer")),
                Some(Reply::Hang) => futures::future::pending().await,
                // Default 404 for unmatched requests
                None => (404, status_json(404, "NotFound", "not found")),
            };
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock namespace JSON response
pub fn namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        }
    })
    .to_string()
}

/// Create a Status failure response
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// The demo deployment as the API server would return it
pub fn server_deployment(name: &str, namespace: &str, resource_version: &str) -> Deployment {
    let mut deployment = DeploymentTemplate::new(name).build();
    deployment.metadata.namespace = Some(namespace.to_string());
    deployment.metadata.resource_version = Some(resource_version.to_string());
    deployment.metadata.uid = Some(format!("uid-{}", name));
    deployment
}

pub fn deployment_json(deployment: &Deployment) -> String {
    serde_json::to_string(deployment).unwrap()
}

pub fn deployment_list_json(deployments: &[Deployment], resource_version: &str) -> String {
    serde_json::json!({
        "apiVersion": "apps/v1",
        "kind": "DeploymentList",
        "metadata": { "resourceVersion": resource_version },
        "items": deployments,
    })
    .to_string()
}

/// One line of a watch stream
pub fn watch_event_line(event_type: &str, deployment: &Deployment) -> String {
    serde_json::json!({
        "type": event_type,
        "object": deployment,
    })
    .to_string()
}

/// A watch error event, e.g. 410 when the resource version has expired
pub fn watch_error_line(code: u16, reason: &str, message: &str) -> String {
    format!(
        r#"{{"type":"ERROR","object":{}}}"#,
        status_json(code, reason, message)
    )
}

pub fn watch_bookmark_line(resource_version: &str) -> String {
    serde_json::json!({
        "type": "BOOKMARK",
        "object": {
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": { "resourceVersion": resource_version }
        }
    })
    .to_string()
}

/// Join watch lines into a newline-delimited body
pub fn watch_body(lines: &[String]) -> String {
    let mut body = lines.join("\n");
    body.push('\n');
    body
}
