/*
[INPUT]:  HTTP configuration (API root, timeouts, credentials)
[OUTPUT]: Configured client ready for signed API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;

use crate::http::signature::RequestSigner;
use crate::http::transport::{ReqwestTransport, Transport};
use crate::http::{AfdianError, Result};

/// Base URL for the Afdian open API
pub const DEFAULT_API_ROOT: &str = "https://afdian.com/api/open/";

const DEFAULT_USER_AGENT: &str = concat!("afdian-client/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bound on every remote call: API requests and remote cache operations
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub api_root: String,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            api_root: DEFAULT_API_ROOT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Credentials issued on the developer page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: String,
    pub token: String,
}

impl Credentials {
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
        }
    }
}

/// Main client for the Afdian open API
#[derive(Debug)]
pub struct AfdianClient {
    transport: Arc<dyn Transport>,
    api_root: Url,
    signer: RequestSigner,
    config: ClientConfig,
}

impl AfdianClient {
    /// Create a new client with default configuration
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let transport =
            ReqwestTransport::new(config.timeout, config.connect_timeout, &config.user_agent)?;
        Self::with_transport(credentials, config, Arc::new(transport))
    }

    /// Create a client that sends through the given transport
    pub fn with_transport(
        credentials: Credentials,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        if credentials.user_id.is_empty() || credentials.token.is_empty() {
            return Err(AfdianError::Config(
                "user id and token must not be empty".to_string(),
            ));
        }

        let api_root = parse_api_root(&config.api_root)?;
        Ok(Self {
            transport,
            api_root,
            signer: RequestSigner::new(credentials),
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    pub(crate) fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Build full URL for an endpoint; only a plain name directly under the
    /// API root is accepted
    pub(crate) fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(AfdianError::EmptyEndpoint);
        }
        if endpoint.contains(['/', '\\', ':', '?', '#', '%']) || endpoint.contains("..") {
            return Err(AfdianError::InvalidEndpoint(endpoint.to_string()));
        }
        Ok(self.api_root.join(endpoint)?)
    }
}

fn parse_api_root(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Ok(Url::parse(trimmed)?)
    } else {
        Ok(Url::parse(&format!("{trimmed}/"))?)
    }
}
