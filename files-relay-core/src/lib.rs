#![doc = "files-relay-core: the authenticated submission pipeline behind files-relay."]

//! This crate holds everything that decides *what happens* during one
//! invocation: input validation, content reading, the collaborator contracts
//! for credential acquisition and file transfer, and the staged orchestrator
//! that sequences them. It contains no network code; concrete HTTP clients
//! live in the `files-relay` crate.
//!
//! # Usage
//! Build a [`pipeline::PipelineConfig`], pick implementations of
//! [`contract::CredentialProvider`] and [`contract::TransferClient`], and hand
//! an [`pipeline::InvocationRequest`] to [`pipeline::Pipeline::run`].

pub mod contract;
pub mod error;
pub mod pipeline;
pub mod read;
pub mod validate;

pub use contract::{BoxError, Credential, CredentialProvider, CredentialRequest, TransferClient};
pub use error::{ErrorKind, PipelineError};
pub use pipeline::{
    Delivery, FileFormat, InvocationRequest, Operation, Pipeline, PipelineConfig, Stage, Target,
    TransferOutcome,
};
pub use read::{read_content, Encoding, ReadError};
pub use validate::validate_path;
