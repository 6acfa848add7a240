//! Client for the Hedvig management API

use std::sync::Arc;

use hedvig_common::{AclCommand, Error, RequestFormat, Result};
use reqwest::{StatusCode, Url};
use tracing::debug;

use crate::config::ProviderConfig;
use crate::session::{SessionProvider, StaticSession};

/// Reply to a management command whose body has not been read yet
#[derive(Debug)]
pub struct ApiResponse {
    pub kind: &'static str,
    pub status: StatusCode,
    response: reqwest::Response,
}

impl ApiResponse {
    /// Fail on any non-2xx status
    pub fn ensure_success(self) -> Result<Self> {
        check_status(self.kind, self.status)?;
        Ok(self)
    }

    /// Read the whole body
    pub async fn body(self) -> Result<Vec<u8>> {
        let body = self.response.bytes().await?.to_vec();
        debug!(
            kind = self.kind,
            status = self.status.as_u16(),
            "body: {}",
            String::from_utf8_lossy(&body)
        );
        Ok(body)
    }
}

fn check_status(kind: &str, status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::Status {
            kind: kind.to_string(),
            status: status.as_u16(),
        })
    }
}

/// Client wrapper for management API communication
#[derive(Clone)]
pub struct HedvigClient {
    node: String,
    http: reqwest::Client,
    session: Arc<dyn SessionProvider>,
    format: RequestFormat,
}

impl HedvigClient {
    /// Create a client for `node` (`host` or `host:port`)
    pub fn new(node: impl Into<String>, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            node: node.into(),
            http: reqwest::Client::new(),
            session,
            format: RequestFormat::default(),
        }
    }

    /// Build a client from provider configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;
        let session = StaticSession::new(config.session_id.clone().unwrap_or_default());
        Ok(Self::new(&config.node, Arc::new(session)).with_format(config.request_format))
    }

    pub fn with_format(mut self, format: RequestFormat) -> Self {
        self.format = format;
        self
    }

    pub fn node(&self) -> &str {
        &self.node
    }

    pub fn format(&self) -> RequestFormat {
        self.format
    }

    /// `http://<node>/rest/`
    pub fn endpoint(&self) -> Result<Url> {
        Url::parse(&format!("http://{}/rest/", self.node))
            .map_err(|e| Error::InvalidConfig(format!("invalid node '{}': {}", self.node, e)))
    }

    /// Issue one management command
    ///
    /// A session id is fetched first; if that fails nothing is sent. The
    /// body is left unread so callers can act on the status alone.
    pub async fn send(&self, command: &AclCommand) -> Result<ApiResponse> {
        let session_id = self.session.session_id().await?;
        let request = command.encode(&session_id, self.format)?;

        let mut url = self.endpoint()?;
        url.query_pairs_mut().append_pair("request", &request);
        debug!(kind = command.kind(), node = %self.node, "Sending management command");

        let response = self.http.get(url).send().await?;
        Ok(ApiResponse {
            kind: command.kind(),
            status: response.status(),
            response,
        })
    }
}

impl std::fmt::Debug for HedvigClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HedvigClient")
            .field("node", &self.node)
            .field("format", &self.format)
            .finish()
    }
}
