use std::path::PathBuf;

use clap::{Parser, Subcommand};
use files_relay_core::{Delivery, Pipeline, PipelineError, ReadError};
use thiserror::Error;

use crate::auth::WrapTokenClient;
use crate::exitcode;
use crate::load_config::Config;
use crate::transfer::FilesApiClient;

/// CLI for files-relay: upload a file, or query a submitted file's results.
#[derive(Parser, Debug)]
#[clap(
    name = "files-relay",
    version,
    about = "Upload files to a token-protected files API and query their summaries and records"
)]
pub struct Cli {
    /// Path to the JSON config file
    #[clap(long, global = true, env = "FILES_RELAY_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload the content of a single file
    Upload {
        /// File to upload
        path: Option<PathBuf>,
    },
    /// Retrieve a previously submitted file's summary or record set
    Query {
        /// `summary` or `records`
        #[clap(long)]
        operation: Option<String>,
        /// Identifier of the submitted file
        #[clap(long = "fileId", alias = "file-id")]
        file_id: Option<String>,
    },
}

/// Top-level error, displayed to the user and mapped to an exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0:#}")]
    Config(anyhow::Error),

    #[error("failed to initialise HTTP client: {0}")]
    Setup(#[from] reqwest::Error),

    #[error("{kind} at {stage} stage: {0}", kind = .0.kind(), stage = .0.stage())]
    Pipeline(#[from] PipelineError),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Config(_) => exitcode::CONFIG,
            CliError::Setup(_) => exitcode::SOFTWARE,
            CliError::Pipeline(e) => match e {
                PipelineError::MissingTarget(_) | PipelineError::InvalidOperation(_) => {
                    exitcode::USAGE
                }
                PipelineError::InvalidPath(_) => exitcode::NOINPUT,
                PipelineError::Read(ReadError::Io { .. }) => exitcode::IOERR,
                PipelineError::Read(ReadError::Encoding { .. }) => exitcode::DATAERR,
                PipelineError::Auth(_) => exitcode::NOPERM,
                PipelineError::Transfer { .. } => exitcode::UNAVAILABLE,
            },
        }
    }
}

/// Run one invocation against the configured issuer and files API.
pub async fn run(command: Commands, config: &Config) -> Result<Delivery, CliError> {
    let pipeline_config = config.pipeline_config();
    let tokens = WrapTokenClient::new(config.timeout())?;
    let files = FilesApiClient::new(config.file_format, config.timeout())?;
    let pipeline = Pipeline::new(&pipeline_config, &tokens, &files);

    let outcome = match command {
        Commands::Upload { path } => pipeline.upload(path).await,
        Commands::Query { operation, file_id } => {
            pipeline
                .query(operation.as_deref(), file_id.as_deref())
                .await
        }
    };
    Ok(outcome?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use files_relay_core::{Encoding, Operation};

    #[test]
    fn exit_codes_follow_error_taxonomy() {
        let io = || std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let cases: Vec<(CliError, u8)> = vec![
            (CliError::Config(anyhow::anyhow!("bad")), exitcode::CONFIG),
            (PipelineError::MissingTarget("fileId").into(), exitcode::USAGE),
            (PipelineError::InvalidOperation(Some("bogus".into())).into(), exitcode::USAGE),
            (PipelineError::InvalidPath("missing.txt".into()).into(), exitcode::NOINPUT),
            (
                PipelineError::Read(ReadError::Io {
                    path: "input.txt".into(),
                    source: io(),
                })
                .into(),
                exitcode::IOERR,
            ),
            (
                PipelineError::Read(ReadError::Encoding {
                    path: "input.txt".into(),
                    encoding: Encoding::Utf8,
                    source: String::from_utf8(vec![0xff]).unwrap_err(),
                })
                .into(),
                exitcode::DATAERR,
            ),
            (PipelineError::Auth("issuer down".into()).into(), exitcode::NOPERM),
            (
                PipelineError::Transfer {
                    operation: Operation::Summary,
                    source: "timeout".into(),
                }
                .into(),
                exitcode::UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.exit_code(), expected, "{error}");
        }
    }

    #[test]
    fn pipeline_errors_name_kind_and_stage() {
        let error = CliError::from(PipelineError::InvalidOperation(Some("bogus".into())));
        assert_eq!(
            error.to_string(),
            "OperationError at start stage: invalid operation: bogus"
        );
    }

    #[test]
    fn query_accepts_camel_case_and_kebab_case_file_id() {
        for flag in ["--fileId", "--file-id"] {
            let cli = Cli::try_parse_from([
                "files-relay",
                "query",
                "--operation",
                "summary",
                flag,
                "F-42",
            ])
            .expect("arguments should parse");
            match cli.command {
                Commands::Query { operation, file_id } => {
                    assert_eq!(operation.as_deref(), Some("summary"));
                    assert_eq!(file_id.as_deref(), Some("F-42"));
                }
                other => panic!("unexpected command: {other:?}"),
            }
        }
    }

    #[test]
    fn upload_path_is_optional_at_parse_time() {
        let cli = Cli::try_parse_from(["files-relay", "upload"]).expect("arguments should parse");
        assert!(matches!(cli.command, Commands::Upload { path: None }));
        assert_eq!(cli.config, PathBuf::from("config.json"));
    }
}
