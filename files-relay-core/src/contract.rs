//! # contract: collaborator interfaces consumed by the pipeline
//!
//! The pipeline never talks to the network itself. It depends on two traits:
//!
//! - [`CredentialProvider`] exchanges stored user credentials and a scope for a
//!   short-lived [`Credential`].
//! - [`TransferClient`] submits content, or fetches a file summary or record set,
//!   against an API root using that credential.
//!
//! Both traits are async, return boxed errors, and are annotated for `mockall`
//! so tests can assert exactly which collaborator calls were (or were not) made.
//!
//! ## Secrets
//! [`Credential`] and [`CredentialRequest`] never print their secret parts via
//! `Debug` or `Display`. Transfer implementations read the raw value through
//! [`Credential::expose`] when building the `Authorization` header.

use std::fmt;

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;

/// Error type returned by collaborators. The pipeline keeps it as the cause of a stage failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Short-lived authorization value issued by the token service.
///
/// Held for the duration of one pipeline run only; never cached or persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Credential(value.into())
    }

    /// The raw authorization value, for use in request headers only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Redacted form suitable for logs: the length of the value, nothing else.
    pub fn redacted(&self) -> String {
        format!("<redacted:{} chars>", self.0.chars().count())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.redacted()).finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// Coordinates needed to ask the issuer for a [`Credential`].
///
/// Sourced from static configuration and read-only for the lifetime of the process.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRequest {
    /// Token issuer endpoint.
    pub issuer_url: String,
    /// User id presented to the issuer.
    pub user_id: String,
    /// Password presented to the issuer.
    pub password: String,
    /// The resource the credential will be used against.
    pub scope: String,
}

impl fmt::Debug for CredentialRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRequest")
            .field("issuer_url", &self.issuer_url)
            .field("user_id", &self.user_id)
            .field("password", &"<redacted>")
            .field("scope", &self.scope)
            .finish()
    }
}

/// Exchanges a [`CredentialRequest`] for a [`Credential`].
///
/// Each call is independent: it either yields a usable credential or an error
/// with a cause. Callers do not retry.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn acquire(&self, request: &CredentialRequest) -> Result<Credential, BoxError>;
}

/// Performs one network transfer against the files API.
///
/// Implementors own transport, serialization and any internal timeouts. Every
/// failure must come back as an `Err`; nothing is dropped silently.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait TransferClient: Send + Sync {
    /// Submit file content. The content is moved into the call.
    async fn submit(
        &self,
        api_root: &str,
        credential: &Credential,
        content: String,
    ) -> Result<Value, BoxError>;

    /// Fetch the summary of a previously submitted file.
    async fn fetch_summary(
        &self,
        api_root: &str,
        credential: &Credential,
        file_id: &str,
    ) -> Result<Value, BoxError>;

    /// Fetch the record set of a previously submitted file.
    async fn fetch_records(
        &self,
        api_root: &str,
        credential: &Credential,
        file_id: &str,
    ) -> Result<Value, BoxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_debug_and_display_never_show_the_value() {
        let credential = Credential::new("token-123");
        assert!(!format!("{credential:?}").contains("token-123"));
        assert!(!format!("{credential}").contains("token-123"));
        assert_eq!(credential.expose(), "token-123");
        assert_eq!(credential.redacted(), "<redacted:9 chars>");
    }

    #[test]
    fn credential_request_debug_hides_password() {
        let request = CredentialRequest {
            issuer_url: "https://sts.example/wrap".into(),
            user_id: "svc-upload".into(),
            password: "hunter2".into(),
            scope: "http://files.example/".into(),
        };
        let rendered = format!("{request:?}");
        assert!(rendered.contains("svc-upload"));
        assert!(!rendered.contains("hunter2"));
    }
}
