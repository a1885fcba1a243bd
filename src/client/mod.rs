//! The push client: credentials, hosts and one method per API endpoint.
//!
//! # Structure
//!
//! - `send` - single and batched message sends
//! - `trace` - delivery statistics and message status
//! - `topic` - topic subscriptions
//! - `device` - per-registration-id lookups and the invalid id feed
//! - `schedule` - scheduled job management

mod device;
mod schedule;
mod send;
mod topic;
mod trace;

use log::debug;
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub use send::TopicOp;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::form::Form;
use crate::http::{HttpRequest, Method, ReqwestTransport, Transport, execute_with_retry};
use crate::logger::{DebugLog, NopLogger};

pub(crate) const SANDBOX_URL: &str = "https://sandbox.xmpush.xiaomi.com";
pub(crate) const PRODUCTION_URL: &str = "https://api.xmpush.xiaomi.com";
pub(crate) const FEEDBACK_URL: &str = "https://feedback.xmpush.xiaomi.com";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";

/// Client for the push REST API.
///
/// Only the sandbox flag and the debug sink can change after construction;
/// both need `&mut self`, so they cannot change under an in-flight call.
pub struct Client {
    app_secret: String,
    package_names: Vec<String>,
    use_sandbox: bool,
    api_url: Option<String>,
    feedback_url: String,
    transport: Arc<dyn Transport>,
    log: Arc<dyn DebugLog>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("package_names", &self.package_names)
            .field("use_sandbox", &self.use_sandbox)
            .field("base_url", &self.base_url())
            .field("feedback_url", &self.feedback_url)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a production client for one or more package names.
    pub fn new<I, S>(app_secret: impl Into<String>, package_names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_config(ClientConfig::new(app_secret, package_names))
    }

    /// Creates a client with a reqwest transport using the config's timeout.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::with_timeout(config.timeout())?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a client that sends through `transport` instead of reqwest.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;

        debug!(
            "Creating push client for {:?} (sandbox: {})",
            config.package_names, config.sandbox
        );

        Ok(Self {
            app_secret: config.app_secret,
            package_names: config.package_names,
            use_sandbox: config.sandbox,
            api_url: config.api_url,
            feedback_url: config
                .feedback_url
                .unwrap_or_else(|| FEEDBACK_URL.to_string()),
            transport,
            log: Arc::new(NopLogger),
        })
    }

    /// Switches between the sandbox and production hosts.
    ///
    /// Has no effect when the config set an explicit `api_url`.
    pub fn use_sandbox(&mut self, use_sandbox: bool) {
        self.use_sandbox = use_sandbox;
    }

    pub fn is_sandbox(&self) -> bool {
        self.use_sandbox
    }

    /// Installs the sink that receives request and response dumps.
    pub fn set_logger(&mut self, logger: Arc<dyn DebugLog>) {
        self.log = logger;
    }

    pub fn package_names(&self) -> &[String] {
        &self.package_names
    }

    fn has_multi_package_name(&self) -> bool {
        self.package_names.len() > 1
    }

    fn joined_package_names(&self) -> String {
        self.package_names.join(",")
    }

    fn base_url(&self) -> &str {
        match &self.api_url {
            Some(url) => url.trim_end_matches('/'),
            None if self.use_sandbox => SANDBOX_URL,
            None => PRODUCTION_URL,
        }
    }

    fn api_uri(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    fn auth_header(&self) -> (String, String) {
        ("Authorization".to_string(), format!("key={}", self.app_secret))
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, form: &Form) -> Result<T> {
        let request = HttpRequest {
            method: Method::Post,
            url: self.api_uri(path),
            headers: vec![
                self.auth_header(),
                ("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ],
            body: Some(form.encode()),
        };
        self.execute(&request).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &Form) -> Result<T> {
        self.get_url(self.api_uri(path), query).await
    }

    async fn get_url<T: DeserializeOwned>(&self, url: String, query: &Form) -> Result<T> {
        let url = if query.is_empty() {
            url
        } else {
            format!("{}?{}", url, query.encode())
        };
        let request = HttpRequest {
            method: Method::Get,
            url,
            headers: vec![self.auth_header()],
            body: None,
        };
        self.execute(&request).await
    }

    async fn execute<T: DeserializeOwned>(&self, request: &HttpRequest) -> Result<T> {
        let body = execute_with_retry(self.transport.as_ref(), self.log.as_ref(), request).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
