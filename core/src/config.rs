//! Runner configuration.
//!
//! Two knobs, both optional and both readable from the environment:
//! the synthetic base URL path-only case URLs resolve against, and a
//! sub-test name filter applied by `run_with`.

use axum::http::uri::{Authority, InvalidUri, Scheme};
use axum::http::Uri;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://example.com";

/// Overrides the base URL, e.g. `HANDLERTEST_BASE_URL=https://api.local`.
pub const BASE_URL_ENV: &str = "HANDLERTEST_BASE_URL";

/// Only named cases whose name contains this value run.
pub const FILTER_ENV: &str = "HANDLERTEST_RUN";

#[derive(Debug, Clone)]
pub struct Config {
    scheme: Scheme,
    authority: Authority,
    filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scheme: Scheme::HTTP,
            authority: Authority::from_static("example.com"),
            filter: None,
        }
    }
}

impl Config {
    /// Read `HANDLERTEST_BASE_URL` and `HANDLERTEST_RUN`, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like `from_env`, with the variable source supplied by the caller.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup(BASE_URL_ENV).filter(|url| !url.is_empty()) {
            config = config.with_base_url(&url)?;
        }
        if let Some(filter) = lookup(FILTER_ENV).filter(|filter| !filter.is_empty()) {
            config = config.with_filter(&filter);
        }
        Ok(config)
    }

    /// Set the base URL. It must be an absolute `http` or `https` URL without
    /// a path, e.g. `https://api.local:8443`.
    pub fn with_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        };
        let uri: Uri = url
            .trim_end_matches('/')
            .parse()
            .map_err(|e: InvalidUri| invalid(&e.to_string()))?;
        let parts = uri.into_parts();
        let scheme = parts.scheme.ok_or_else(|| invalid("missing scheme"))?;
        if scheme != Scheme::HTTP && scheme != Scheme::HTTPS {
            return Err(invalid("scheme must be http or https"));
        }
        let authority = parts.authority.ok_or_else(|| invalid("missing host"))?;
        if parts.path_and_query.is_some_and(|pq| pq.as_str() != "/") {
            return Err(invalid("must not have a path or query"));
        }
        self.scheme = scheme;
        self.authority = authority;
        Ok(self)
    }

    pub fn with_filter(mut self, filter: &str) -> Self {
        self.filter = Some(filter.to_string());
        self
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.authority)
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub(crate) fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub(crate) fn authority(&self) -> &Authority {
        &self.authority
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn default_base_is_example_com() {
        let config = Config::default();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert!(config.filter().is_none());
    }

    #[test]
    fn lookup_overrides_base_and_filter() {
        let config = Config::from_lookup(lookup(&[
            (BASE_URL_ENV, "https://api.local:8443/"),
            (FILTER_ENV, "todos"),
        ]))
        .unwrap();
        assert_eq!(config.base_url(), "https://api.local:8443");
        assert_eq!(config.filter(), Some("todos"));
    }

    #[test]
    fn empty_variables_fall_back_to_defaults() {
        let config =
            Config::from_lookup(lookup(&[(BASE_URL_ENV, ""), (FILTER_ENV, "")])).unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert!(config.filter().is_none());
    }

    #[test]
    fn base_url_rejects_relative_and_foreign_urls() {
        assert!(Config::default().with_base_url("/just/a/path").is_err());
        assert!(Config::default().with_base_url("ftp://example.com").is_err());
        assert!(Config::default().with_base_url("http://example.com/api").is_err());
    }

    #[test]
    fn invalid_base_url_error_names_the_url() {
        let err = Config::default().with_base_url("ftp://example.com").unwrap_err();
        assert!(err.to_string().contains("ftp://example.com"));
    }
}
