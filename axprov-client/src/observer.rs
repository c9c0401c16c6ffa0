use http::StatusCode;
use reqwest::header::HeaderMap;

use crate::soap;

/// Observational hook around each remote call.
///
/// Observers see the serialized message bodies exactly as they cross the
/// wire; they cannot alter, retry or block the call.
pub trait RequestObserver {
    fn egress(&self, operation: &str, headers: &HeaderMap, body: &str);
    fn ingress(&self, operation: &str, status: StatusCode, body: &str);
}

/// Prints every request and response to standard output, re-indented for
/// reading.
pub struct ConsoleObserver;

impl RequestObserver for ConsoleObserver {
    fn egress(&self, operation: &str, headers: &HeaderMap, body: &str) {
        println!("\nRequest ({operation})\n-------\nHeaders:\n{headers:?}\n\nBody:\n{}", soap::pretty_print(body));
    }

    fn ingress(&self, operation: &str, status: StatusCode, body: &str) {
        println!("\nResponse ({operation})\n--------\nStatus: {status}\n\nBody:\n{}", soap::pretty_print(body));
    }
}
