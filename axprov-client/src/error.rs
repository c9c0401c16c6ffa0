use std::path::PathBuf;

use http::StatusCode;
use reqwest::header::InvalidHeaderValue;

/// Semantic rejection returned by the server for a syntactically valid
/// request, e.g. a duplicate name or a dangling reference.
#[derive(thiserror::Error, Clone, Debug, Eq, PartialEq)]
#[error("{code}: {message}")]
pub struct Fault {
    pub code: String,
    pub message: String,
}

#[derive(thiserror::Error, Debug)]
pub enum RequestError {
    #[error("Request dispatch error: {0}")]
    Request(reqwest::Error),
    #[error("Received status code '{0}' indicating an error: {1}")]
    IllegalRequest(StatusCode, String),
    #[error("XML serialization error: {0}")]
    XmlSerialization(EnvelopeError),
    #[error("XML deserialization error: {0}")]
    XmlDeserialization(EnvelopeError),
    #[error("Invalid header: {0}")]
    InvalidHeader(InvalidHeaderValue),
}

/// Per-operation error, split by whether the server answered.
///
/// A `Fault` means the request reached the server and was rejected there;
/// `Transport` covers everything below that (connection, timeout, status
/// codes without a fault body, codec errors).
#[derive(thiserror::Error, Debug)]
pub enum CallError {
    #[error("The server rejected the '{operation}' request:\n  {fault}")]
    Fault {
        operation: &'static str,
        fault: Fault,
    },
    #[error("Could not complete the '{operation}' request:\n  {cause}")]
    Transport {
        operation: &'static str,
        cause: RequestError,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum CreateClientError {
    #[error("Invalid header: {0}")]
    InvalidHeader(InvalidHeaderValue),
    #[error("'{value}' is not a valid endpoint address:\n  {cause}")]
    InvalidEndpoint { value: String, cause: String },
    #[error("Could not read the CA bundle at '{path}':\n  {cause}")]
    TrustBundle { path: PathBuf, cause: String },
    #[error("The service description does not declare the '{operation}' operation!")]
    MissingOperation { operation: &'static str },
    #[error("Failed to instantiate client, due to an error: {cause}")]
    InstantiationFailure { cause: String },
}

#[derive(thiserror::Error, Debug)]
pub enum DescriptionError {
    #[error("Could not read the service description at '{path}':\n  {cause}")]
    Unreadable { path: PathBuf, cause: String },
    #[error("The service description at '{path}' is not well-formed:\n  {cause}")]
    Malformed { path: PathBuf, cause: String },
    #[error("The service description at '{path}' declares no target namespace!")]
    MissingNamespace { path: PathBuf },
    #[error("The service description at '{path}' does not declare a '{binding}' binding!")]
    MissingBinding { path: PathBuf, binding: String },
}

#[derive(thiserror::Error, Debug)]
pub enum EnvelopeError {
    #[error("Failed to write XML: {0}")]
    Write(String),
    #[error("Failed to read XML: {0}")]
    Read(String),
}
