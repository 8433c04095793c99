// Copyright (c) 2024 Botho Foundation

//! Configuration for the API and kernel clients.

use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use url::Url;

/// Environment variable replacing the API host list.
pub const API_HOST_ENV: &str = "MIXIN_API_HOST";

/// Environment variable replacing the kernel RPC host list.
pub const KERNEL_RPC_ENV: &str = "MIXIN_KERNEL_RPC";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Safe API hosts, tried in order
    #[serde(default = "default_api_hosts")]
    pub api_hosts: Vec<String>,

    /// Kernel RPC hosts, tried in order
    #[serde(default = "default_kernel_rpc_hosts")]
    pub kernel_rpc_hosts: Vec<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_hosts() -> Vec<String> {
    vec![
        "https://api.mixin.one".to_string(),
        "https://mixin-api.zeromesh.net".to_string(),
    ]
}

fn default_kernel_rpc_hosts() -> Vec<String> {
    vec!["https://kernel.mixin.dev".to_string()]
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_hosts: default_api_hosts(),
            kernel_rpc_hosts: default_kernel_rpc_hosts(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the host lists from the environment. Each variable holds a
    /// comma-separated list.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(API_HOST_ENV).ok().as_deref(),
            std::env::var(KERNEL_RPC_ENV).ok().as_deref(),
        );
    }

    fn apply_overrides(&mut self, api: Option<&str>, kernel: Option<&str>) {
        if let Some(hosts) = api.map(split_hosts).filter(|h| !h.is_empty()) {
            tracing::debug!("API hosts overridden from {}", API_HOST_ENV);
            self.api_hosts = hosts;
        }
        if let Some(hosts) = kernel.map(split_hosts).filter(|h| !h.is_empty()) {
            tracing::debug!("Kernel RPC hosts overridden from {}", KERNEL_RPC_ENV);
            self.kernel_rpc_hosts = hosts;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_hosts.is_empty() {
            anyhow::bail!("At least one API host must be specified");
        }
        if self.kernel_rpc_hosts.is_empty() {
            anyhow::bail!("At least one kernel RPC host must be specified");
        }
        for host in self.api_hosts.iter().chain(&self.kernel_rpc_hosts) {
            let url = Url::parse(host)
                .map_err(|e| anyhow::anyhow!("host {} is not a valid URL: {}", host, e))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                anyhow::bail!("host {} must use http or https", host);
            }
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn split_hosts(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_hosts.len(), 2);
        assert_eq!(config.kernel_rpc_hosts, vec!["https://kernel.mixin.dev"]);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str("timeout_secs = 5").unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.api_hosts, default_api_hosts());
    }

    #[test]
    fn test_validate_rejects_bad_hosts() {
        let config = ClientConfig {
            kernel_rpc_hosts: vec![],
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            api_hosts: vec!["ftp://api.mixin.one".to_string()],
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            api_hosts: vec!["not a url".to_string()],
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_replace_host_lists() {
        let mut config = ClientConfig::default();
        config.apply_overrides(Some("http://a:1, http://b:2"), None);
        assert_eq!(config.api_hosts, vec!["http://a:1", "http://b:2"]);
        assert_eq!(config.kernel_rpc_hosts, default_kernel_rpc_hosts());

        config.apply_overrides(Some(" , "), Some("http://node:8239"));
        assert_eq!(config.api_hosts, vec!["http://a:1", "http://b:2"]);
        assert_eq!(config.kernel_rpc_hosts, vec!["http://node:8239"]);
    }
}
