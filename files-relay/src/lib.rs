pub mod auth;
pub mod cli;
pub mod exitcode;
pub mod load_config;
pub mod logging;
pub mod transfer;

pub use cli::{run, Cli, CliError, Commands};
