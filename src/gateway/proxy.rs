//! Chooses between the first-party wiki-summary proxy and direct upstream calls.

use std::net::IpAddr;

use serde::Deserialize;

use crate::config::{ApiConfig, PlatformConfig};

/// Runtime the caller is running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// iOS, Android or desktop; no cross-origin restrictions
    #[default]
    Native,
    /// A browser, subject to CORS
    Web,
}

impl Platform {
    pub fn is_browser(self) -> bool {
        matches!(self, Platform::Web)
    }
}

/// Loopback, `*.local` and RFC 1918 hosts count as local development.
pub fn is_local_host(hostname: &str) -> bool {
    let host = hostname
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_ascii_lowercase();

    if host == "localhost" || host.ends_with(".local") {
        return true;
    }

    match host.parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => ip.is_loopback() || ip.is_private(),
        Ok(IpAddr::V6(ip)) => ip.is_loopback(),
        Err(_) => false,
    }
}

/// Proxy only from a browser on a deployed (non-local) host.
pub fn should_use_proxy(platform: Platform, hostname: &str) -> bool {
    platform.is_browser() && !is_local_host(hostname)
}

#[derive(Debug, Clone)]
pub struct ProxySelector {
    platform: Platform,
    hostname: String,
    api_base: String,
    proxy_path: String,
}

impl ProxySelector {
    pub fn new(platform: &PlatformConfig, api: &ApiConfig) -> Self {
        Self {
            platform: platform.kind,
            hostname: platform.hostname.clone(),
            api_base: api.api_base.clone(),
            proxy_path: api.proxy_path.clone(),
        }
    }

    pub fn should_use_proxy(&self) -> bool {
        should_use_proxy(self.platform, &self.hostname)
    }

    /// `{api_base}{proxy_path}?title={encoded_title}`
    ///
    /// An empty `api_base` means the proxy lives on the page's own origin,
    /// `https://{hostname}`.
    pub fn build_proxy_url(&self, encoded_title: &str) -> String {
        let base = self.origin();
        let path = self.proxy_path.trim();
        let separator = if path.starts_with('/') { "" } else { "/" };
        format!("{}{}{}?title={}", base, separator, path, encoded_title)
    }

    fn origin(&self) -> String {
        let base = self.api_base.trim().trim_end_matches('/');
        if base.is_empty() {
            format!("https://{}", self.hostname.trim())
        } else {
            base.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_hosts_never_proxy() {
        for host in [
            "localhost",
            "127.0.0.1",
            "192.168.1.5",
            "10.0.0.12",
            "172.16.4.1",
            "172.31.255.255",
            "my-laptop.local",
            "[::1]",
            "LOCALHOST",
        ] {
            assert!(!should_use_proxy(Platform::Web, host), "host: {}", host);
        }
    }

    #[test]
    fn test_public_host_proxies_in_browser() {
        assert!(should_use_proxy(Platform::Web, "smartencyclopedia.uk"));
        assert!(should_use_proxy(Platform::Web, "172.32.0.1"));
        assert!(should_use_proxy(Platform::Web, "8.8.8.8"));
    }

    #[test]
    fn test_native_never_proxies() {
        for host in ["smartencyclopedia.uk", "localhost", "192.168.1.5"] {
            assert!(!should_use_proxy(Platform::Native, host));
        }
    }

    #[test]
    fn test_build_proxy_url() {
        let platform = PlatformConfig {
            kind: Platform::Web,
            hostname: "smartencyclopedia.uk".into(),
            cross_origin_section_fetch: None,
        };
        let mut api = ApiConfig::default();
        let selector = ProxySelector::new(&platform, &api);
        assert!(selector.should_use_proxy());
        assert_eq!(
            selector.build_proxy_url("Black%20hole"),
            "https://smartencyclopedia.uk/api/wiki-summary?title=Black%20hole"
        );

        api.api_base = "https://smartencyclopedia.uk/".into();
        api.proxy_path = "proxy/summary".into();
        let selector = ProxySelector::new(&platform, &api);
        assert_eq!(
            selector.build_proxy_url("X"),
            "https://smartencyclopedia.uk/proxy/summary?title=X"
        );
    }
}
