use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderValue};
use reqwest::{Body, Method, Request, Url};

use axprov_types::{DeviceName, EndUser, Phone, UserId, UserUpdate};

use crate::client::auth::BasicCredentials;
use crate::client::request_handler::{DefaultRequestHandler, RequestHandler};
use crate::client::TlsPolicy;
use crate::error::{CallError, CreateClientError, RequestError};
use crate::observer::RequestObserver;
use crate::soap::{self, DecodedResponse, WriteXml};
use crate::wsdl::ServiceDescription;
use crate::{routes, AxlApi, AxlResponse};

/// The operations the client dispatches. All of them must be declared by
/// the service description before the first call is attempted.
const OPERATIONS: [&str; 5] = ["addPhone", "addUser", "updateUser", "removeUser", "removePhone"];

const CONTENT_TYPE_XML: &str = "text/xml; charset=utf-8";

pub struct AxlClientConfig {
    pub host: String,
    pub port: u16,
    pub credentials: BasicCredentials,
    pub tls: TlsPolicy,
    pub timeout: Duration,
}

pub struct AxlClient {
    endpoint: Url,
    description: ServiceDescription,
    requester: Box<dyn RequestHandler + Send + Sync>,
    observer: Option<Box<dyn RequestObserver + Send + Sync>>,
}

impl std::fmt::Debug for AxlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AxlClient")
            .field("endpoint", &self.endpoint)
            .field("description", &self.description)
            .field("has_observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl AxlClient {
    pub fn create(config: AxlClientConfig, description: ServiceDescription) -> Result<Self, CreateClientError> {
        for operation in OPERATIONS {
            if !description.has_operation(operation) {
                return Err(CreateClientError::MissingOperation { operation });
            }
        }

        let endpoint = routes::endpoint(&config.host, config.port)?;

        let headers = {
            let mut headers = header::HeaderMap::new();
            headers.append(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_XML));

            let auth_header = config.credentials.sensitive_header()
                .map_err(CreateClientError::InvalidHeader)?;
            headers.append(header::AUTHORIZATION, auth_header);

            headers
        };

        let builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout);

        let builder = match &config.tls {
            TlsPolicy::Insecure => builder.danger_accept_invalid_certs(true),
            TlsPolicy::TrustBundle(path) => {
                let bundle = std::fs::read(path)
                    .map_err(|cause| CreateClientError::TrustBundle { path: Clone::clone(path), cause: cause.to_string() })?;
                let certificate = reqwest::Certificate::from_pem(&bundle)
                    .map_err(|cause| CreateClientError::TrustBundle { path: Clone::clone(path), cause: cause.to_string() })?;
                builder.add_root_certificate(certificate)
            }
        };

        let client = builder.build()
            .map_err(|cause| CreateClientError::InstantiationFailure { cause: cause.to_string() })?;

        Ok(Self::new(endpoint, description, Box::new(DefaultRequestHandler::from(client))))
    }

    pub(super) fn new(endpoint: Url, description: ServiceDescription, requester: Box<dyn RequestHandler + Send + Sync>) -> Self {
        Self {
            endpoint,
            description,
            requester,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn RequestObserver + Send + Sync>) -> Self {
        self.observer = Some(observer);
        self
    }

    async fn dispatch<P>(&self, operation: &'static str, payload: &P) -> Result<AxlResponse, CallError>
    where P: WriteXml + Sync {
        let body = soap::encode_request(self.description.target_namespace(), operation, payload)
            .map_err(|cause| CallError::Transport { operation, cause: RequestError::XmlSerialization(cause) })?;

        let mut request = Request::new(Method::POST, Clone::clone(&self.endpoint));
        request.headers_mut().insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_XML));
        if let Some(action) = self.description.soap_action(operation) {
            let value = HeaderValue::from_str(&format!("\"{action}\""))
                .map_err(|cause| CallError::Transport { operation, cause: RequestError::InvalidHeader(cause) })?;
            request.headers_mut().insert("SOAPAction", value);
        }
        *request.body_mut() = Some(Body::from(Clone::clone(&body)));

        if let Some(observer) = &self.observer {
            observer.egress(operation, request.headers(), &body);
        }

        tracing::debug!("Dispatching '{operation}' request to <{}>.", self.endpoint);

        let response = self.requester.handle(request).await
            .map_err(|cause| CallError::Transport { operation, cause })?;

        let status = response.status();
        let text = response.text().await
            .map_err(|cause| CallError::Transport { operation, cause: RequestError::Request(cause) })?;

        if let Some(observer) = &self.observer {
            observer.ingress(operation, status, &text);
        }

        match soap::decode_response(&text) {
            Ok(DecodedResponse::Fault(fault)) => {
                tracing::debug!("The '{operation}' request was rejected: {fault}");
                Err(CallError::Fault { operation, fault })
            }
            Ok(DecodedResponse::Success { return_value }) => {
                if status.is_success() {
                    Ok(AxlResponse { return_value, body: text })
                } else {
                    Err(CallError::Transport { operation, cause: RequestError::IllegalRequest(status, text) })
                }
            }
            Err(cause) => {
                if status.is_success() {
                    Err(CallError::Transport { operation, cause: RequestError::XmlDeserialization(cause) })
                } else {
                    Err(CallError::Transport { operation, cause: RequestError::IllegalRequest(status, text) })
                }
            }
        }
    }
}

#[async_trait]
impl AxlApi for AxlClient {
    async fn add_phone(&self, phone: &Phone) -> Result<AxlResponse, CallError> {
        self.dispatch("addPhone", phone).await
    }

    async fn add_user(&self, user: &EndUser) -> Result<AxlResponse, CallError> {
        self.dispatch("addUser", user).await
    }

    async fn update_user(&self, update: &UserUpdate) -> Result<AxlResponse, CallError> {
        self.dispatch("updateUser", update).await
    }

    async fn remove_user(&self, user_id: &UserId) -> Result<AxlResponse, CallError> {
        self.dispatch("removeUser", &soap::Keyed { element: "userid", value: user_id.value() }).await
    }

    async fn remove_phone(&self, name: &DeviceName) -> Result<AxlResponse, CallError> {
        self.dispatch("removePhone", &soap::Keyed { element: "name", value: name.value() }).await
    }
}
