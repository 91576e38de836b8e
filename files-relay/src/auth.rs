#![doc = "Credential acquisition against an OAuth WRAP token issuer (STS)."]
//
//! [`WrapTokenClient`] implements the core [`CredentialProvider`] contract. It
//! posts the configured user id, password and scope to the issuer as a form,
//! reads the form-encoded reply, and turns `wrap_access_token` into the
//! `Authorization` header value the files API expects:
//!
//! ```text
//! WRAP access_token="<token>"
//! ```
//!
//! Token expiry is the issuer's business; a credential is used once and dropped.

use std::time::Duration;

use async_trait::async_trait;
use files_relay_core::{BoxError, Credential, CredentialProvider, CredentialRequest};
use reqwest::Client;

pub struct WrapTokenClient {
    http: Client,
}

impl WrapTokenClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http))
    }

    pub fn with_client(http: Client) -> Self {
        WrapTokenClient { http }
    }
}

#[async_trait]
impl CredentialProvider for WrapTokenClient {
    async fn acquire(&self, request: &CredentialRequest) -> Result<Credential, BoxError> {
        tracing::info!(
            issuer = %request.issuer_url,
            user_id = %request.user_id,
            scope = %request.scope,
            "Requesting WRAP access token"
        );

        let form = [
            ("wrap_name", request.user_id.as_str()),
            ("wrap_password", request.password.as_str()),
            ("wrap_scope", request.scope.as_str()),
        ];
        let response = self
            .http
            .post(&request.issuer_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, issuer = %request.issuer_url, "Token issuer unreachable");
                e
            })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::error!(%status, issuer = %request.issuer_url, "Token issuer rejected the request");
            return Err(format!("token issuer returned {status}: {}", body.trim()).into());
        }

        let token = parse_access_token(&body)
            .ok_or("token issuer response did not contain wrap_access_token")?;
        Ok(Credential::new(format!("WRAP access_token=\"{token}\"")))
    }
}

/// Extract `wrap_access_token` from a form-encoded issuer response.
fn parse_access_token(body: &str) -> Option<String> {
    url::form_urlencoded::parse(body.trim().as_bytes())
        .find(|(key, _)| key == "wrap_access_token")
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
}
