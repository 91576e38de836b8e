//! JSON configuration: logging directory, token issuer coordinates, files API root, file format.
//!
//! The file is read once at startup and is read-only afterwards. Secrets may be
//! kept out of the file: `FILES_RELAY_PWD` (environment or `.env`) overrides
//! `oauthWrapRequest.creds.pwd`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use files_relay_core::{CredentialRequest, Encoding, FileFormat, PipelineConfig};
use serde::Deserialize;
use tracing::{debug, error, info, warn};
use url::Url;

/// Environment variable that overrides the issuer password from the config file.
pub const PASSWORD_ENV: &str = "FILES_RELAY_PWD";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    pub oauth_wrap_request: OAuthWrapRequest,
    pub files_api: FilesApiConfig,
    #[serde(default)]
    pub file_format: FileFormat,
    #[serde(default)]
    pub file_encoding: Encoding,
    /// Set when `creds.pwd` was replaced from [`PASSWORD_ENV`].
    #[serde(skip)]
    pub password_from_env: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingConfig {
    /// Directory for log files; stderr only when absent.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthWrapRequest {
    /// Token issuer (STS) URL.
    pub url: String,
    pub creds: Creds,
    /// The resource the token will be used against.
    pub wrap_scope: String,
}

#[derive(Deserialize)]
pub struct Creds {
    pub uid: String,
    #[serde(default)]
    pub pwd: String,
}

impl fmt::Debug for Creds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Creds")
            .field("uid", &self.uid)
            .field("pwd", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesApiConfig {
    pub root_url: String,
    /// Per-request HTTP timeout for the issuer and files API clients.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Config {
    pub fn trace_loaded(&self) {
        info!(
            issuer = %self.oauth_wrap_request.url,
            api_root = %self.files_api.root_url,
            file_format = ?self.file_format,
            log_dir = ?self.logging.directory,
            "Loaded Config"
        );
        if self.password_from_env {
            info!("{PASSWORD_ENV} found in env, overriding creds.pwd");
        }
        debug!(?self, "Config loaded (full debug)");
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.files_api.timeout_secs)
    }

    /// Project onto the read-only settings the pipeline consumes.
    pub fn pipeline_config(&self) -> PipelineConfig {
        let wrap = &self.oauth_wrap_request;
        PipelineConfig {
            credential_request: CredentialRequest {
                issuer_url: wrap.url.clone(),
                user_id: wrap.creds.uid.clone(),
                password: wrap.creds.pwd.clone(),
                scope: wrap.wrap_scope.clone(),
            },
            api_root: self.files_api.root_url.clone(),
            file_format: self.file_format,
            encoding: self.file_encoding,
        }
    }
}

/// Loads the JSON config file, applies the password override and checks required values.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = fs::read_to_string(path_ref).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
        anyhow::anyhow!("Failed to read config file {:?}: {}", path_ref, e)
    })?;

    let mut config: Config = serde_json::from_str(&config_content).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to parse config JSON");
        anyhow::anyhow!("Failed to parse config JSON: {e}")
    })?;

    if let Ok(pwd) = std::env::var(PASSWORD_ENV) {
        config.oauth_wrap_request.creds.pwd = pwd;
        config.password_from_env = true;
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let wrap = &config.oauth_wrap_request;
    Url::parse(&wrap.url).with_context(|| format!("oauthWrapRequest.url is not a valid URL: {}", wrap.url))?;
    Url::parse(&config.files_api.root_url)
        .with_context(|| format!("filesApi.rootUrl is not a valid URL: {}", config.files_api.root_url))?;

    if wrap.creds.uid.trim().is_empty() {
        anyhow::bail!("oauthWrapRequest.creds.uid must not be empty");
    }
    if wrap.creds.pwd.is_empty() {
        anyhow::bail!("oauthWrapRequest.creds.pwd is empty; set it in the config file or via {PASSWORD_ENV}");
    }
    if wrap.wrap_scope.trim().is_empty() {
        warn!("oauthWrapRequest.wrapScope is empty");
    }
    if config.files_api.timeout_secs == 0 {
        anyhow::bail!("filesApi.timeoutSecs must be greater than zero");
    }
    Ok(())
}
