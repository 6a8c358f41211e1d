//! Workflow HTTP client.
//!
//! Sends the same form posts as the mobile app: a device description, the
//! session tokens and the operation-specific fields.

use std::sync::Arc;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use tracing::debug;

use crate::domain::TokenSet;

use super::WorkflowApi;
use super::error::WorkflowError;
use super::node::confirm_hire_node;
use super::types::{Fragment, Operation, WorkflowResponse};

/// Default base URL for the workflow API.
const DEFAULT_BASE_URL: &str = "https://ce-a22.corethree.net";

/// User auth captured from the mobile app.
pub const DEFAULT_USER_AUTH: &str = "564e7ff6ebbf80c4cafb4c7b7d3ea7bbc4435ad0|bcSxLxDWpaTC";

const DEFAULT_USER_AGENT: &str =
    "Core/202503171232 (iOS; iPad14,1; iPadOS 18.3.2; uk.gov.tfl.cyclehire)";

const DEFAULT_CAPABILITIES: &str = "inlinevouchers,expirytags,bucketpopulation,vzero,creditcall-chipdna,card.io,camera,camera-front,camera-rear,ble-unknown,location-on-wheninuse,londonriders,londonridersphase2r1,londonridersphase3,londonridersphase4,3dsenabled,ebikesphase2,daypass";

/// Maximum number of body characters kept in error messages.
const BODY_SNIPPET_CHARS: usize = 500;

/// Configuration for the workflow client.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// `c3-userauth` value identifying the account
    pub user_auth: String,
    /// Base URL for the API
    pub base_url: String,
    pub user_agent: String,
    pub accept_language: String,
    pub language: String,
    pub apply_sensitive_data_check: String,
    pub scale_factor: String,
    pub capabilities: String,
    pub battery_level: String,
    /// Reported user latitude
    pub user_lat: String,
    /// Reported user longitude
    pub user_long: String,
    pub device_id: String,
    pub control_values: String,
    /// Event name sent with node events
    pub event_name: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
}

impl WorkflowConfig {
    /// Create a new config with the given user auth and app defaults.
    pub fn new(user_auth: impl Into<String>) -> Self {
        Self {
            user_auth: user_auth.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-SG,en-GB;q=0.9,en;q=0.8".to_string(),
            language: "en".to_string(),
            apply_sensitive_data_check: "y".to_string(),
            scale_factor: "2.00".to_string(),
            capabilities: DEFAULT_CAPABILITIES.to_string(),
            battery_level: "-1.000000".to_string(),
            user_lat: "51.5282".to_string(),
            user_long: "-0.121092".to_string(),
            device_id: "555D91A6-5B1E-49BC-9624-1989B4DA4833".to_string(),
            control_values: "cHTnp0wCbVOhbs12x8sR4+2I/8CVACvEd8Zn5e3Tpas=".to_string(),
            event_name: "Click".to_string(),
            timeout_secs: 20,
            accept_invalid_certs: false,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the reported device identifier.
    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = device_id.into();
        self
    }

    /// Set the reported user position.
    pub fn with_user_location(mut self, lat: impl Into<String>, long: impl Into<String>) -> Self {
        self.user_lat = lat.into();
        self.user_long = long.into();
        self
    }

    /// Skip TLS certificate verification.
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AUTH)
    }
}

/// Workflow API client.
#[derive(Debug, Clone)]
pub struct WorkflowClient {
    http: reqwest::Client,
    config: Arc<WorkflowConfig>,
}

impl WorkflowClient {
    /// Create a new workflow client with the given configuration.
    pub fn new(config: WorkflowConfig) -> Result<Self, WorkflowError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let language =
            HeaderValue::from_str(&config.accept_language).map_err(|_| WorkflowError::Api {
                status: 0,
                message: "Invalid Accept-Language format".to_string(),
            })?;
        headers.insert(ACCEPT_LANGUAGE, language);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// Press "Confirm hire" for a terminal and return the rendered page.
    pub async fn confirm_hire(
        &self,
        terminal_id: &str,
        point_name: &str,
        tokens: &TokenSet,
    ) -> Result<Vec<Fragment>, WorkflowError> {
        let url = format!(
            "{}/Workflows/HandleEventWithNode?format=json",
            self.config.base_url
        );

        let mut form = self.device_params(tokens);
        form.push(("Node", confirm_hire_node(terminal_id, point_name)));
        form.push(("Event", self.config.event_name.clone()));

        debug!(terminal_id, point_name, "confirm hire request");
        self.post_form(&url, tokens, &form).await
    }

    /// Run a station search and return the rendered result page.
    pub async fn search(
        &self,
        text: &str,
        tokens: &TokenSet,
    ) -> Result<Vec<Fragment>, WorkflowError> {
        let url = format!(
            "{}/Clients/TfL/GenerateLCHSDynamicSearch",
            self.config.base_url
        );

        let mut form = self.device_params(tokens);
        form.push(("lchs_search_text", text.to_string()));
        form.push(("postback", "1".to_string()));
        form.push(("format", "json".to_string()));

        debug!(text, "station search request");
        self.post_form(&url, tokens, &form).await
    }

    /// Form fields common to every workflow request.
    fn device_params(&self, tokens: &TokenSet) -> Vec<(&'static str, String)> {
        let c = &self.config;
        vec![
            ("c3-clienttime", tokens.client_time().as_str().to_string()),
            ("c3-language", c.language.clone()),
            ("c3-applysensitivedatacheck", c.apply_sensitive_data_check.clone()),
            ("c3-scalefactor", c.scale_factor.clone()),
            ("c3-capabilities", c.capabilities.clone()),
            ("c3-batterylevel", c.battery_level.clone()),
            ("c3-userlat", c.user_lat.clone()),
            ("c3-userlong", c.user_long.clone()),
            ("c3-deviceid", c.device_id.clone()),
            ("c3-controlvals", c.control_values.clone()),
            ("c3-userauth", c.user_auth.clone()),
        ]
    }

    async fn post_form(
        &self,
        url: &str,
        tokens: &TokenSet,
        form: &[(&'static str, String)],
    ) -> Result<Vec<Fragment>, WorkflowError> {
        let encoding =
            HeaderValue::from_str(tokens.encoding()).map_err(|_| WorkflowError::InvalidEncoding)?;

        debug!(
            encoding = %tokens.encoding_preview(),
            client_time = %tokens.client_time(),
            "posting workflow form"
        );

        let response = self
            .http
            .post(url)
            .header("c3-encoding", encoding)
            .form(form)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(WorkflowError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WorkflowError::Api {
                status: status.as_u16(),
                message: body.chars().take(BODY_SNIPPET_CHARS).collect(),
            });
        }

        let body = response.text().await?;

        let parsed: WorkflowResponse =
            serde_json::from_str(&body).map_err(|e| WorkflowError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(BODY_SNIPPET_CHARS).collect()),
            })?;

        debug!(fragments = parsed.children.len(), "workflow response");
        Ok(parsed.children)
    }
}

impl WorkflowApi for WorkflowClient {
    async fn invoke(
        &self,
        operation: &Operation,
        tokens: &TokenSet,
    ) -> Result<Vec<Fragment>, WorkflowError> {
        match operation {
            Operation::ConfirmHire {
                terminal_id,
                point_name,
            } => self.confirm_hire(terminal_id, point_name, tokens).await,
            Operation::Search { text } => self.search(text, tokens).await,
        }
    }
}
