use async_trait::async_trait;
use serde::Serialize;

use axprov_types::{DeviceName, EndUser, Phone, UserId, UserUpdate};

pub mod client;
pub mod error;
pub mod observer;
pub mod routes;
pub mod soap;
pub mod wsdl;

pub use client::{AxlClient, AxlClientConfig, BasicCredentials, TlsPolicy};
pub use error::{CallError, CreateClientError, DescriptionError, Fault, RequestError};
pub use observer::{ConsoleObserver, RequestObserver};
pub use wsdl::ServiceDescription;

/// Result of a successful remote call.
///
/// `return_value` holds the text of the server's `return` element (the
/// created row's pkid, or a row count for removals), when present.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AxlResponse {
    pub return_value: Option<String>,
    pub body: String,
}

/// The administrative operations of the call manager's AXL interface
/// which this tool consumes.
#[async_trait]
pub trait AxlApi {
    async fn add_phone(&self, phone: &Phone) -> Result<AxlResponse, CallError>;
    async fn add_user(&self, user: &EndUser) -> Result<AxlResponse, CallError>;
    async fn update_user(&self, update: &UserUpdate) -> Result<AxlResponse, CallError>;
    async fn remove_user(&self, user_id: &UserId) -> Result<AxlResponse, CallError>;
    async fn remove_phone(&self, name: &DeviceName) -> Result<AxlResponse, CallError>;
}
