//! High-level pipeline: validate → read → acquire credential → transfer, for one invocation.
//!
//! This module sequences the stages of a single files-relay invocation and
//! isolates their failures:
//!   - **upload**: the file path is validated, its content read, a credential
//!     acquired, and the content submitted.
//!   - **summary / records**: a credential is acquired and the file id is
//!     queried directly; validation and reading are skipped.
//!
//! # Responsibilities
//! - Strictly linear, fail-fast sequencing: a failed stage stops the run and no
//!   later stage (in particular no network call) starts.
//! - Every failure is attributable: [`PipelineError::stage`] names where it happened.
//! - Nothing is retried and no timeout is imposed here; collaborators own that.
//!
//! # Navigation
//! - Entrypoint: [`Pipeline::run`] (or [`Pipeline::upload`] / [`Pipeline::query`],
//!   which include the Start-stage argument checks).
//! - Supporting types: [`InvocationRequest`], [`PipelineConfig`], [`Delivery`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::contract::{Credential, CredentialProvider, CredentialRequest, TransferClient};
use crate::error::PipelineError;
use crate::read::{read_content, Encoding};
use crate::validate::validate_path;

/// Result of one invocation: the delivered response, or the stage failure that halted it.
pub type TransferOutcome = Result<Delivery, PipelineError>;

/// Pipeline states a run can halt in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Validating,
    Reading,
    AcquiringCredential,
    Transferring,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Start => "start",
            Stage::Validating => "validating",
            Stage::Reading => "reading",
            Stage::AcquiringCredential => "acquiring-credential",
            Stage::Transferring => "transferring",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Upload,
    Summary,
    Records,
}

impl Operation {
    /// Parse a query operation name. Only `summary` and `records` are accepted.
    pub fn parse_query(name: &str) -> Option<Operation> {
        match name {
            "summary" => Some(Operation::Summary),
            "records" => Some(Operation::Records),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Upload => "upload",
            Operation::Summary => "summary",
            Operation::Records => "records",
        })
    }
}

/// Declared content type of uploaded files. Passed through, never checked against content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    #[default]
    Txt,
    Json,
}

/// What an invocation acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    File(&'a Path),
    FileId(&'a str),
}

/// One operation requested by the process input. Immutable once built.
///
/// The constructors are the Start stage: they reject missing or blank targets
/// and unknown operation names before any filesystem or network activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationRequest {
    Upload { path: PathBuf },
    Summary { file_id: String },
    Records { file_id: String },
}

impl InvocationRequest {
    pub fn upload(path: Option<PathBuf>) -> Result<Self, PipelineError> {
        match path {
            Some(path) if !path.as_os_str().is_empty() => Ok(InvocationRequest::Upload { path }),
            _ => Err(PipelineError::MissingTarget("file path")),
        }
    }

    /// Build a query request. The operation name is checked before the file id.
    /// A non-blank file id is kept exactly as given.
    pub fn query(operation: Option<&str>, file_id: Option<&str>) -> Result<Self, PipelineError> {
        let operation = operation
            .and_then(Operation::parse_query)
            .ok_or_else(|| PipelineError::InvalidOperation(operation.map(str::to_owned)))?;

        let file_id = match file_id {
            Some(id) if !id.trim().is_empty() => id.to_owned(),
            _ => return Err(PipelineError::MissingTarget("fileId")),
        };

        Ok(match operation {
            Operation::Records => InvocationRequest::Records { file_id },
            _ => InvocationRequest::Summary { file_id },
        })
    }

    pub fn operation(&self) -> Operation {
        match self {
            InvocationRequest::Upload { .. } => Operation::Upload,
            InvocationRequest::Summary { .. } => Operation::Summary,
            InvocationRequest::Records { .. } => Operation::Records,
        }
    }

    pub fn target(&self) -> Target<'_> {
        match self {
            InvocationRequest::Upload { path } => Target::File(path),
            InvocationRequest::Summary { file_id } | InvocationRequest::Records { file_id } => {
                Target::FileId(file_id)
            }
        }
    }
}

/// Read-only settings for a run, constructed once at startup.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub credential_request: CredentialRequest,
    /// Root URL of the files API.
    pub api_root: String,
    pub file_format: FileFormat,
    pub encoding: Encoding,
}

/// Successful end of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delivery {
    pub operation: Operation,
    /// Payload returned by the files API.
    pub response: Value,
}

/// Sequences one invocation over borrowed configuration and collaborators.
pub struct Pipeline<'a, C: ?Sized, T: ?Sized> {
    config: &'a PipelineConfig,
    credentials: &'a C,
    transfer: &'a T,
}

impl<'a, C, T> Pipeline<'a, C, T>
where
    C: CredentialProvider + ?Sized,
    T: TransferClient + ?Sized,
{
    pub fn new(config: &'a PipelineConfig, credentials: &'a C, transfer: &'a T) -> Self {
        Pipeline {
            config,
            credentials,
            transfer,
        }
    }

    /// Upload flow, starting from the raw path argument.
    pub async fn upload(&self, path: Option<PathBuf>) -> TransferOutcome {
        debug!(path = ?path, "[PIPELINE] upload requested");
        match InvocationRequest::upload(path) {
            Ok(request) => self.run(request).await,
            Err(e) => Err(report_failure(e)),
        }
    }

    /// Query flow, starting from the raw `operation` and `fileId` arguments.
    pub async fn query(&self, operation: Option<&str>, file_id: Option<&str>) -> TransferOutcome {
        debug!(?operation, ?file_id, "[PIPELINE] query requested");
        match InvocationRequest::query(operation, file_id) {
            Ok(request) => self.run(request).await,
            Err(e) => Err(report_failure(e)),
        }
    }

    /// Run a validated request to its terminal outcome.
    pub async fn run(&self, request: InvocationRequest) -> TransferOutcome {
        let operation = request.operation();
        debug!(%operation, target = ?request.target(), "[PIPELINE] run started");
        match self.execute(request).await {
            Ok(response) => {
                info!(%operation, response = %response, "[PIPELINE] transfer succeeded");
                Ok(Delivery {
                    operation,
                    response,
                })
            }
            Err(e) => Err(report_failure(e)),
        }
    }

    async fn execute(&self, request: InvocationRequest) -> Result<Value, PipelineError> {
        match request {
            InvocationRequest::Upload { path } => {
                enter(Stage::Validating);
                debug!(path = %path.display(), "[PIPELINE] validating path");
                if !validate_path(&path) {
                    return Err(PipelineError::InvalidPath(path));
                }

                enter(Stage::Reading);
                let content = read_content(&path, self.config.encoding)
                    .await
                    .map_err(|e| {
                        error!(path = %e.path().display(), error = %e, "[PIPELINE][ERROR] file could not be read");
                        e
                    })?;
                info!(
                    path = %path.display(),
                    chars = content.chars().count(),
                    file_format = ?self.config.file_format,
                    "[PIPELINE] file content loaded"
                );

                let credential = self.authorize().await?;

                enter(Stage::Transferring);
                self.transfer
                    .submit(&self.config.api_root, &credential, content)
                    .await
                    .map_err(|source| PipelineError::Transfer {
                        operation: Operation::Upload,
                        source,
                    })
            }
            InvocationRequest::Summary { file_id } => {
                let credential = self.authorize().await?;

                enter(Stage::Transferring);
                self.transfer
                    .fetch_summary(&self.config.api_root, &credential, &file_id)
                    .await
                    .map_err(|source| PipelineError::Transfer {
                        operation: Operation::Summary,
                        source,
                    })
            }
            InvocationRequest::Records { file_id } => {
                let credential = self.authorize().await?;

                enter(Stage::Transferring);
                self.transfer
                    .fetch_records(&self.config.api_root, &credential, &file_id)
                    .await
                    .map_err(|source| PipelineError::Transfer {
                        operation: Operation::Records,
                        source,
                    })
            }
        }
    }

    async fn authorize(&self) -> Result<Credential, PipelineError> {
        enter(Stage::AcquiringCredential);
        let request = &self.config.credential_request;
        let credential = self
            .credentials
            .acquire(request)
            .await
            .map_err(PipelineError::Auth)?;
        // Only the redacted form is ever logged.
        debug!(
            issuer = %request.issuer_url,
            scope = %request.scope,
            authorization = %credential,
            "[PIPELINE] authorization acquired"
        );
        Ok(credential)
    }
}

fn enter(stage: Stage) {
    debug!(%stage, "[PIPELINE] entering stage");
}

fn report_failure(e: PipelineError) -> PipelineError {
    error!(stage = %e.stage(), kind = ?e.kind(), error = %e, "[PIPELINE][ERROR] run halted");
    e
}
