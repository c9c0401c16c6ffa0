use std::path::PathBuf;

pub use auth::BasicCredentials;
pub use implementation::{AxlClient, AxlClientConfig};

mod auth;
mod implementation;
mod request_handler;
mod tests;

/// How the server's certificate is checked when the session is established.
#[derive(Clone, Debug)]
pub enum TlsPolicy {
    /// Accept any certificate the server presents. Lab default; the call
    /// manager usually ships with a self-signed certificate.
    Insecure,
    /// Verify the server against a PEM bundle of trusted certificates.
    TrustBundle(PathBuf),
}
