//! HTTP client for the remote catalog listing.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;

use crate::config::CatalogConfig;
use crate::seed::source::{PokemonSource, SourceError, SourcePage, SourceRecord};

/// Source reading `GET {base_url}?limit={n}` from a PokeAPI-style endpoint.
#[derive(Debug, Clone)]
pub struct HttpPokemonSource {
    client: Client,
    base_url: String,
}

impl HttpPokemonSource {
    /// Creates a source for `base_url` with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns `Request` if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Request {
                url: base_url.clone(),
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self { client, base_url })
    }

    /// Creates a source from configuration.
    ///
    /// # Errors
    ///
    /// Returns `Request` if the HTTP client cannot be constructed.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, SourceError> {
        Self::new(config.source_url.clone(), config.source_timeout())
    }

    /// The endpoint this source reads.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl PokemonSource for HttpPokemonSource {
    fn fetch(&self, limit: usize) -> Result<Vec<SourceRecord>, SourceError> {
        let request_failed = |e: reqwest::Error| SourceError::Request {
            url: self.base_url.clone(),
            message: e.to_string(),
        };

        debug!("fetching {limit} records from {}", self.base_url);
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("limit", limit)])
            .send()
            .map_err(request_failed)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.base_url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(request_failed)?;
        let page = SourcePage::from_json(&body)?;
        Ok(page.results.into_iter().take(limit).collect())
    }
}
