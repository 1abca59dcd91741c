//! Service endpoint configuration.
//!
//! [`ServiceConfiguration`] tells the transport renderer which host serves
//! each [`ServiceTarget`] and which `User-Agent` to send. It can be built in
//! code or loaded from JSON.
//!
//! # Example
//!
//! ```
//! use textsecure_request::ServiceConfiguration;
//!
//! let config = ServiceConfiguration::from_json(
//!     r#"{ "main_url": "https://staging.example.org", "user_agent": "demo/1.0" }"#,
//! )?;
//! assert_eq!(config.main_url, "https://staging.example.org");
//! # Ok::<(), textsecure_request::ConstructionError>(())
//! ```

use serde::{Deserialize, Serialize};
use textsecure_request_core::{ConstructionError, ServiceTarget};
use url::Url;

/// Default hosts and client name.
pub mod defaults {
    pub const MAIN_URL: &str = "https://textsecure-service.whispersystems.org";
    pub const CONTACT_DISCOVERY_URL: &str = "https://api.directory.signal.org";
    pub const KEY_BACKUP_URL: &str = "https://api.backup.signal.org";
    pub const USER_AGENT: &str = concat!("textsecure-request/", env!("CARGO_PKG_VERSION"));
}

/// Hosts and client identity used when rendering descriptors.
///
/// Fields missing from a JSON document fall back to [`defaults`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfiguration {
    pub main_url: String,
    pub contact_discovery_url: String,
    pub key_backup_url: String,
    pub user_agent: String,
}

impl Default for ServiceConfiguration {
    fn default() -> Self {
        Self {
            main_url: defaults::MAIN_URL.to_owned(),
            contact_discovery_url: defaults::CONTACT_DISCOVERY_URL.to_owned(),
            key_backup_url: defaults::KEY_BACKUP_URL.to_owned(),
            user_agent: defaults::USER_AGENT.to_owned(),
        }
    }
}

impl ServiceConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration document and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConstructionError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConstructionError::invalid("configuration", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn main_url<S: Into<String>>(mut self, url: S) -> Self {
        self.main_url = url.into();
        self
    }

    pub fn contact_discovery_url<S: Into<String>>(mut self, url: S) -> Self {
        self.contact_discovery_url = url.into();
        self
    }

    pub fn key_backup_url<S: Into<String>>(mut self, url: S) -> Self {
        self.key_backup_url = url.into();
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Check that every host is an absolute http(s) URL and the user agent is set.
    pub fn validate(&self) -> Result<(), ConstructionError> {
        for target in [
            ServiceTarget::Main,
            ServiceTarget::ContactDiscovery,
            ServiceTarget::KeyBackup,
        ] {
            self.url_for(target)?;
        }
        if self.user_agent.is_empty() {
            return Err(ConstructionError::empty("user agent"));
        }
        Ok(())
    }

    /// Base URL for `target`.
    pub fn url_for(&self, target: ServiceTarget) -> Result<Url, ConstructionError> {
        let raw = match target {
            ServiceTarget::Main => &self.main_url,
            ServiceTarget::ContactDiscovery => &self.contact_discovery_url,
            ServiceTarget::KeyBackup => &self.key_backup_url,
        };
        let url = Url::parse(raw).map_err(|e| {
            ConstructionError::InvalidUrl(format!("{} url {:?}: {}", target.as_str(), raw, e))
        })?;
        if !matches!(url.scheme(), "https" | "http") || url.cannot_be_a_base() {
            return Err(ConstructionError::InvalidUrl(format!(
                "{} url {:?} must be an absolute http(s) url",
                target.as_str(),
                raw
            )));
        }
        Ok(url)
    }
}
