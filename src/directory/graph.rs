//! Graph directory client.
//!
//! Performs the OAuth2 client-credentials exchange, then walks the
//! paginated `applications` listing with the resulting bearer token.
//! A fresh token is requested for every fetch.

use super::{
    model::{ApplicationPage, TokenResponse},
    Application, DirectoryError, DirectorySource,
};
use crate::config::DirectoryConfig;
use reqwest::{Client, Proxy, Response};
use std::time::Duration;

/// Connect timeout for the token and directory endpoints.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Directory client backed by the Graph `applications` endpoint.
#[derive(Debug, Clone)]
pub struct GraphDirectory {
    client: Client,
    config: DirectoryConfig,
}

impl GraphDirectory {
    /// Builds a client, routing through the configured proxy if any.
    pub fn new(config: DirectoryConfig) -> Result<Self, DirectoryError> {
        let mut builder = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(Duration::from_secs(config.timeout_secs));

        if let Some(proxy) = config.proxy() {
            let proxy = Proxy::all(proxy)
                .map_err(|e| DirectoryError::ClientBuild(format!("invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        } else {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| DirectoryError::ClientBuild(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn access_token(&self) -> Result<String, DirectoryError> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("scope", self.config.scope.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .client
            .post(self.config.token_url())
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, body) = status_and_body(response).await;
            return Err(DirectoryError::Token { status, body });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    async fn page(&self, url: &str, token: &str) -> Result<ApplicationPage, DirectoryError> {
        let response = self.client.get(url).bearer_auth(token).send().await?;

        if !response.status().is_success() {
            let (status, body) = status_and_body(response).await;
            return Err(DirectoryError::Listing { status, body });
        }

        Ok(response.json().await?)
    }
}

impl DirectorySource for GraphDirectory {
    async fn applications(&self) -> Result<Vec<Application>, DirectoryError> {
        let token = self.access_token().await?;

        let mut applications = Vec::new();
        let mut next = Some(self.config.applications_url());
        let mut pages = 0u32;

        while let Some(url) = next.take() {
            let page = self.page(&url, &token).await?;
            pages += 1;
            applications.extend(page.value);
            next = page.next_link;
        }

        tracing::debug!(
            pages,
            applications = applications.len(),
            "Fetched application listing"
        );

        Ok(applications)
    }
}

async fn status_and_body(response: Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    (status, body)
}
