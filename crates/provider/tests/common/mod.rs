//! In-process mock of the Hedvig management API

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use hedvig_provider::{HedvigClient, StaticSession};

pub const SESSION: &str = "session-1";

const KINDS: [&str; 3] = ["PersistACLAccess", "GetACLInformation", "RemoveACLAccess"];

#[derive(Default)]
struct Inner {
    requests: Vec<String>,
    replies: HashMap<&'static str, (StatusCode, String)>,
}

/// Records every `request` parameter and answers per command kind
#[derive(Clone, Default)]
pub struct MockCluster {
    inner: Arc<Mutex<Inner>>,
    pub node: String,
}

impl MockCluster {
    pub async fn start() -> Self {
        let mut cluster = MockCluster::default();
        let app = Router::new()
            .route("/rest/", get(handle))
            .with_state(cluster.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        cluster.node = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        cluster
    }

    pub fn client(&self) -> HedvigClient {
        HedvigClient::new(&self.node, Arc::new(StaticSession::new(SESSION)))
    }

    /// Override the reply for one command kind
    pub fn reply(&self, kind: &'static str, status: StatusCode, body: impl Into<String>) {
        self.inner
            .lock()
            .unwrap()
            .replies
            .insert(kind, (status, body.into()));
    }

    pub fn requests(&self) -> Vec<String> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.requests().iter().map(|r| kind_of(r)).collect()
    }
}

pub fn kind_of(request: &str) -> &'static str {
    KINDS
        .iter()
        .copied()
        .find(|k| request.contains(k))
        .unwrap_or("Unknown")
}

/// Value of `field` in either a legacy or a JSON encoded command
pub fn field(request: &str, field: &str) -> Option<String> {
    for (open, close) in [(format!("{}:'", field), '\''), (format!("\"{}\":\"", field), '"')] {
        if let Some(start) = request.find(&open) {
            let rest = &request[start + open.len()..];
            return rest.find(close).map(|end| rest[..end].to_string());
        }
    }
    None
}

async fn handle(
    State(cluster): State<MockCluster>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    let request = params.get("request").cloned().unwrap_or_default();
    let kind = kind_of(&request);

    let mut inner = cluster.inner.lock().unwrap();
    inner.requests.push(request);

    if let Some(reply) = inner.replies.get(kind) {
        return reply.clone();
    }

    // By default the disk reports the most recently granted host
    let body = match kind {
        "GetACLInformation" => {
            let host = inner
                .requests
                .iter()
                .rev()
                .filter(|r| kind_of(r) == "PersistACLAccess")
                .find_map(|r| field(r, "host"))
                .unwrap_or_default();
            format!(
                r#"{{"requestId":"1","status":"ok","type":"GetACLInformation","result":[{{"host":"{}","initiator":[]}}]}}"#,
                host
            )
        }
        kind => format!(r#"{{"requestId":"1","status":"ok","type":"{}"}}"#, kind),
    };

    (StatusCode::OK, body)
}
